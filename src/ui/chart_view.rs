//! Line chart renderer
//!
//! Draws a [`ChartData`] with ratatui's `Chart` widget. Terminal cells can't
//! draw dash patterns or translucency, so each style is approximated: dashes
//! become sparser markers, alpha darkens the color, and filled series are
//! drawn as bars down to the axis.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use crate::chart::{self, ChartData, DashPattern, SeriesStyle};

/// Maximum number of x-axis labels drawn before thinning
const MAX_X_LABELS: usize = 7;

/// Renders a chart into `area`, or a placeholder if it has no points
pub fn render(frame: &mut Frame, area: Rect, data: &ChartData) {
    let block = Block::default()
        .title(format!(" {} ", data.options.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if data.is_empty() {
        let paragraph = Paragraph::new("No data yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = data
        .datasets
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = data
        .datasets
        .iter()
        .zip(points.iter())
        .map(|(series, points)| {
            Dataset::default()
                .name(series.label.clone())
                .marker(series_marker(&series.style))
                .graph_type(if series.style.fill {
                    GraphType::Bar
                } else {
                    GraphType::Line
                })
                .style(Style::default().fg(series_color(&series.style)))
                .data(points)
        })
        .collect();

    let [y_min, y_max] = y_bounds(data);
    let x_max = (data.labels.len().saturating_sub(1)).max(1) as f64;

    let legend = match data.options.legend {
        chart::LegendPosition::Top => LegendPosition::TopRight,
        chart::LegendPosition::Bottom => LegendPosition::BottomRight,
    };

    let label_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(legend))
        .hidden_legend_constraints((
            ratatui::layout::Constraint::Percentage(50),
            ratatui::layout::Constraint::Percentage(50),
        ))
        .x_axis(
            Axis::default()
                .style(label_style)
                .bounds([0.0, x_max])
                .labels(
                    x_axis_labels(&data.labels, MAX_X_LABELS)
                        .into_iter()
                        .map(Span::raw)
                        .collect::<Vec<_>>(),
                ),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    data.options.y_axis_title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .style(label_style)
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_tick(y_min)),
                    Span::raw(format_tick((y_min + y_max) / 2.0)),
                    Span::raw(format_tick(y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Blends the series color toward black by its alpha
pub fn series_color(style: &SeriesStyle) -> Color {
    // Keep faint series visible on a dark terminal
    let alpha = (style.alpha as f64 / 255.0).max(0.35);
    let scale = |c: u8| (c as f64 * alpha).round() as u8;
    Color::Rgb(scale(style.color.r), scale(style.color.g), scale(style.color.b))
}

/// Picks a marker that approximates the dash pattern
pub fn series_marker(style: &SeriesStyle) -> Marker {
    match style.dash {
        DashPattern::Solid => Marker::Braille,
        DashPattern::Dashed { gap, .. } if gap >= 4 => Marker::Dot,
        DashPattern::Dashed { .. } => Marker::Block,
    }
}

/// Y-axis bounds covering every value, starting at zero when requested
pub fn y_bounds(data: &ChartData) -> [f64; 2] {
    let values = data.datasets.iter().flat_map(|s| s.values.iter().copied());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let lower = if data.options.begin_at_zero {
        min.min(0.0)
    } else {
        min
    };
    let upper = if max > lower { max } else { lower + 1.0 };
    [lower, upper]
}

/// Thins labels to at most `max` evenly spaced entries, always keeping both ends
///
/// Ratatui spreads axis labels evenly, so the chosen entries must be evenly
/// spaced in the source too.
pub fn x_axis_labels(labels: &[String], max: usize) -> Vec<String> {
    if labels.len() <= max || max < 2 {
        return labels.to_vec();
    }
    let last = labels.len() - 1;
    (0..max)
        .map(|i| labels[(i * last + (max - 1) / 2) / (max - 1)].clone())
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
