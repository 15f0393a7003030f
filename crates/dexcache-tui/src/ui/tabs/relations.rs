use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the Relations tab - scatter plots across the sample
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.table.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            " No data loaded yet.",
            styles::muted_style(),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let stat_points: Vec<(f64, f64)> = app
        .table
        .rows
        .iter()
        .filter_map(|r| Some((r.stat("attack")? as f64, r.stat("defense")? as f64)))
        .collect();
    render_scatter(
        frame,
        chunks[0],
        " Attack vs Defense ",
        "Attack",
        "Defense",
        &stat_points,
    );

    let size_points: Vec<(f64, f64)> = app
        .table
        .rows
        .iter()
        .map(|r| (r.height_m, r.weight_kg))
        .collect();
    render_scatter(
        frame,
        chunks[1],
        " Height vs Weight ",
        "Height (m)",
        "Weight (kg)",
        &size_points,
    );
}

fn render_scatter(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
) {
    let (x_max, y_max) = points.iter().fold((0.0f64, 0.0f64), |(xm, ym), (x, y)| {
        (xm.max(*x), ym.max(*y))
    });
    // Pad the bounds so edge points stay off the border
    let x_max = (x_max * 1.1).max(1.0);
    let y_max = (y_max * 1.1).max(1.0);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(styles::highlight_style())
        .data(points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title.to_string())
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .x_axis(
            Axis::default()
                .title(x_label.to_string())
                .style(styles::muted_style())
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title(y_label.to_string())
                .style(styles::muted_style())
                .bounds([0.0, y_max])
                .labels(axis_labels(y_max)),
        );

    frame.render_widget(chart, area);
}

fn axis_labels(max: f64) -> Vec<String> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| {
            if max >= 20.0 {
                format!("{:.0}", v)
            } else {
                format!("{:.1}", v)
            }
        })
        .collect()
}
