use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_height, format_weight};

/// Bucket width for the stat histogram.
const HISTOGRAM_BUCKET: i64 = 20;

/// How many abilities the bottom table shows.
const TOP_ABILITY_COUNT: usize = 10;

/// How many primary types fit the bar chart comfortably.
const TYPE_CHART_LIMIT: usize = 9;

/// Render the Overview tab - metrics and aggregate charts
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.table.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            " No data loaded yet.",
            styles::muted_style(),
        )))
        .block(Block::default().borders(Borders::ALL).border_style(styles::border_style(false)));
        frame.render_widget(placeholder, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Headline metrics
            Constraint::Length(4),  // Extremes
            Constraint::Min(8),     // Charts
            Constraint::Length(6),  // Top abilities
        ])
        .split(area);

    render_metrics(frame, app, chunks[0]);
    render_extremes(frame, app, chunks[1]);
    render_charts(frame, app, chunks[2]);
    render_abilities(frame, app, chunks[3]);
}

fn metric_box(frame: &mut Frame, area: Rect, label: &str, value: &str, detail: &str) {
    let lines = vec![
        Line::from(Span::styled(format!(" {}", label), styles::muted_style())),
        Line::from(vec![
            Span::styled(format!(" {}", value), styles::title_style()),
            Span::styled(format!("  {}", detail), styles::muted_style()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    metric_box(
        frame,
        chunks[0],
        "Sample",
        &app.table.len().to_string(),
        &format!("of {} in index", app.refs.len()),
    );
    metric_box(
        frame,
        chunks[1],
        "Abilities (global)",
        &app.ability_total.to_string(),
        "",
    );

    let top_type = app
        .table
        .most_common_primary_type()
        .map(|t| dexcache_core::models::capitalize(&t))
        .unwrap_or_else(|| "-".to_string());
    metric_box(frame, chunks[2], "Top primary type", &top_type, "");
}

fn render_extremes(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let boxes = [
        ("Heaviest", app.table.heaviest().map(|r| (r.name.clone(), format_weight(r.weight_kg)))),
        ("Lightest", app.table.lightest().map(|r| (r.name.clone(), format_weight(r.weight_kg)))),
        ("Tallest", app.table.tallest().map(|r| (r.name.clone(), format_height(r.height_m)))),
        ("Shortest", app.table.shortest().map(|r| (r.name.clone(), format_height(r.height_m)))),
    ];

    for (i, (label, entry)) in boxes.iter().enumerate() {
        match entry {
            Some((name, value)) => metric_box(frame, chunks[i], label, name, value),
            None => metric_box(frame, chunks[i], label, "-", ""),
        }
    }
}

fn render_charts(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_type_chart(frame, app, chunks[0]);
    render_histogram(frame, app, chunks[1]);
}

fn render_type_chart(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.table.primary_type_counts();
    let shown = counts.len().min(TYPE_CHART_LIMIT);
    let data: Vec<(&str, u64)> = counts[..shown]
        .iter()
        .map(|(name, count)| (name.as_str(), *count as u64))
        .collect();

    let title = if counts.len() > shown {
        format!(" By Primary Type (top {}) ", shown)
    } else {
        " By Primary Type ".to_string()
    };

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .data(data.as_slice())
        .bar_width(7)
        .bar_gap(1)
        .bar_style(styles::success_style())
        .value_style(styles::highlight_style());

    frame.render_widget(chart, area);
}

fn render_histogram(frame: &mut Frame, app: &App, area: Rect) {
    let (stat_id, label) = app.histogram_stat();
    let hist = app.table.stat_histogram(stat_id, HISTOGRAM_BUCKET);

    let labels: Vec<String> = hist.iter().map(|(start, _)| start.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(hist.iter())
        .map(|(bucket, (_, count))| (bucket.as_str(), *count as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {} Distribution - [s] next stat ", label))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(styles::highlight_style())
        .value_style(styles::list_item_style());

    frame.render_widget(chart, area);
}

fn render_abilities(frame: &mut Frame, app: &App, area: Rect) {
    let top = app.table.top_abilities(TOP_ABILITY_COUNT);

    let header = Row::new([Cell::from("Ability"), Cell::from("Count")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = top
        .iter()
        .map(|(name, count)| {
            Row::new([
                Cell::from(name.clone()),
                Cell::from(count.to_string()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [Constraint::Percentage(70), Constraint::Percentage(30)];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Top {} Abilities ", TOP_ABILITY_COUNT))
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}
