use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus, CANONICAL_STATS};
use crate::ui::styles;
use crate::utils::{format_height, format_weight, truncate_string};

/// Width of the stat bar in the detail panel, in characters.
const STAT_BAR_WIDTH: usize = 24;

/// Base stats cap out around this value; used to scale the bars.
const STAT_BAR_MAX: i64 = 255;

/// Render the Pokedex tab - selectable list with a detail panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_list(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let rows_data = app.filtered_rows();
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("ID"),
        Cell::from("Type"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = rows_data
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i == app.pokedex_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            let types = record
                .types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            Row::new([
                Cell::from(record.name.clone()),
                Cell::from(format!("{:>4}", record.id)),
                Cell::from(types),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(45), // Name
        Constraint::Length(5),      // ID
        Constraint::Fill(2),        // Type
    ];

    let title = format!(" Pokedex ({}) - [/] search ", rows_data.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.pokedex_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let Some(record) = app.selected_row() else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            " No entry selected",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let types = record
        .types
        .iter()
        .map(|t| dexcache_core::models::capitalize(t))
        .collect::<Vec<_>>()
        .join(", ");
    let abilities = record.abilities.join(", ");

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", record.name), styles::title_style()),
            Span::styled(format!("#{}", record.id), styles::muted_style()),
        ]),
        Line::from(""),
        detail_line("Type(s):   ", &types),
        detail_line("Height:    ", &format_height(record.height_m)),
        detail_line("Weight:    ", &format_weight(record.weight_kg)),
        detail_line("Abilities: ", &abilities),
        detail_line(
            "Sprite:    ",
            &truncate_string(record.sprite_url.as_deref().unwrap_or("-"), 48),
        ),
        Line::from(""),
        Line::from(Span::styled(" Base Stats", styles::highlight_style())),
    ];

    for (stat_id, label) in CANONICAL_STATS {
        match record.stat(stat_id) {
            Some(value) => {
                let filled = ((value.clamp(0, STAT_BAR_MAX) as usize) * STAT_BAR_WIDTH)
                    / STAT_BAR_MAX as usize;
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<8}", label), styles::list_item_style()),
                    Span::styled(format!("{:>4}  ", value), styles::highlight_style()),
                    Span::styled("█".repeat(filled.max(1)), styles::stat_bar_style(value)),
                ]));
            }
            None => {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<8}", label), styles::list_item_style()),
                    Span::styled("   -", styles::muted_style()),
                ]));
            }
        }
    }

    // Stats outside the canonical six still belong to the record
    let extra: Vec<&str> = record
        .stats
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| !CANONICAL_STATS.iter().any(|(id, _)| id == name))
        .collect();
    if !extra.is_empty() {
        lines.push(Line::from(""));
        lines.push(detail_line("Other:     ", &extra.join(", ")));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {}", label), styles::muted_style()),
        Span::styled(value.to_string(), styles::list_item_style()),
    ])
}
