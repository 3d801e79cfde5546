//! Dashboard screen UI
//!
//! Renders the tab bar, the status/error line, and the body of the selected
//! tab: current conditions, AQI trend, per-metric forecast, or predictions.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::{ForecastMetric, NormalizedReading, Pollutants, WeatherReadings};
use crate::ui::{chart_view, colors};

/// Renders the dashboard screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(1), // Status line
            Constraint::Min(6),    // Body
            Constraint::Length(1), // Help hint
        ])
        .split(area);

    render_tabs(frame, chunks[0], app);
    frame.render_widget(Paragraph::new(build_status_line(app)), chunks[1]);

    match app.view {
        View::Current => render_current(frame, chunks[2], app.reading.as_ref()),
        View::Trend => chart_view::render(frame, chunks[2], &app.trend_chart()),
        View::Forecast => render_forecast(frame, chunks[2], app),
        View::Prediction => render_prediction(frame, chunks[2], app),
    }

    render_help_text(frame, chunks[3], app.view);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.reading {
        Some(reading) => format!(" Airwatch · {} ", reading.location),
        None => " Airwatch ".to_string(),
    };

    let tabs = Tabs::new(View::ALL.iter().map(|v| v.title()).collect::<Vec<_>>())
        .select(app.view.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HEADER))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().fg(colors::SECONDARY))
        .highlight_style(
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("│");

    frame.render_widget(tabs, area);
}

/// Builds the one-line status: error banner, refresh indicator, or last update
fn build_status_line(app: &App) -> Line<'static> {
    if let Some(error) = &app.error {
        let suffix = if app.reading.is_some() {
            " (showing last good data)"
        } else {
            ""
        };
        return Line::from(vec![
            Span::styled(
                " ⚠ ",
                Style::default()
                    .fg(colors::ERROR)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{}{}", error, suffix), Style::default().fg(colors::ERROR)),
        ]);
    }

    if app.refreshing {
        return Line::from(Span::styled(
            " Refreshing...",
            Style::default().fg(colors::HEADER),
        ));
    }

    match app.last_refresh {
        Some(at) => Line::from(Span::styled(
            format!(" Updated {}", at.format("%-I:%M:%S %p")),
            Style::default().fg(colors::MUTED),
        )),
        None => Line::from(""),
    }
}

fn render_current(frame: &mut Frame, area: Rect, reading: Option<&NormalizedReading>) {
    let Some(reading) = reading else {
        render_no_data(frame, area, "No data available");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // AQI
            Constraint::Length(5), // Weather + location
            Constraint::Min(3),    // Pollutants
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(build_aqi_lines(reading))
            .alignment(Alignment::Center)
            .block(section_block(" Air Quality Index ")),
        chunks[0],
    );

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    frame.render_widget(
        Paragraph::new(build_weather_lines(&reading.weather)).block(section_block(" Weather ")),
        middle[0],
    );
    frame.render_widget(
        Paragraph::new(build_location_lines(reading)).block(section_block(" Location ")),
        middle[1],
    );

    frame.render_widget(
        Paragraph::new(build_pollutant_lines(&reading.pollutants))
            .wrap(Wrap { trim: false })
            .block(section_block(" Pollutants ")),
        chunks[2],
    );
}

fn build_aqi_lines(reading: &NormalizedReading) -> Vec<Line<'static>> {
    let category = reading.category();
    let color = colors::category_color(category);

    vec![
        Line::from(Span::styled(
            format!("{}", reading.aqi),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            category.label().to_string(),
            Style::default().fg(color),
        )),
        Line::from(Span::styled(
            format_local_datetime(&reading.timestamp),
            Style::default().fg(colors::MUTED),
        )),
    ]
}

fn build_weather_lines(weather: &WeatherReadings) -> Vec<Line<'static>> {
    vec![
        labelled_line("Temperature", format_optional(weather.temperature, "°C")),
        labelled_line("Humidity", format_optional(weather.humidity, "%")),
    ]
}

fn build_location_lines(reading: &NormalizedReading) -> Vec<Line<'static>> {
    vec![
        labelled_line("Latitude", format!("{:.4}", reading.coordinates.lat)),
        labelled_line("Longitude", format!("{:.4}", reading.coordinates.lon)),
    ]
}

/// One entry per reported pollutant; unreported ones are left out entirely
fn build_pollutant_lines(pollutants: &Pollutants) -> Vec<Line<'static>> {
    let present = pollutants.present();
    if present.is_empty() {
        return vec![Line::from(Span::styled(
            "No pollutant readings reported",
            Style::default().fg(colors::MUTED),
        ))];
    }

    let spans: Vec<Span<'static>> = present
        .into_iter()
        .flat_map(|(code, value)| {
            [
                Span::styled(
                    format!(" {} ", code.to_uppercase()),
                    Style::default().fg(colors::SECONDARY),
                ),
                Span::styled(
                    format!("{:.1}   ", value),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
            ]
        })
        .collect();

    vec![Line::from(spans)]
}

fn render_forecast(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    frame.render_widget(
        Paragraph::new(build_metric_selector(
            app.forecast_metric,
            &app.available_forecast_metrics(),
        )),
        chunks[0],
    );

    match app.forecast_chart() {
        Some(chart) => chart_view::render(frame, chunks[1], &chart),
        None => render_no_data(
            frame,
            chunks[1],
            &format!("No {} forecast available", app.forecast_metric.short_name()),
        ),
    }
}

/// Metric picker; metrics without data are dimmed
fn build_metric_selector(selected: ForecastMetric, available: &[ForecastMetric]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, metric) in ForecastMetric::ALL.iter().enumerate() {
        let style = if *metric == selected {
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if available.contains(metric) {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::MUTED)
        };
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, metric.short_name()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_prediction(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(chart) = app.prediction_chart() {
        chart_view::render(frame, area, &chart);
        return;
    }

    let message = match &app.prediction_error {
        Some(err) => err.clone(),
        None => "No prediction file loaded (use --predictions FILE)".to_string(),
    };
    render_no_data(frame, area, &message);
}

fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(colors::MUTED))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MUTED)),
        );
    frame.render_widget(paragraph, area);
}

fn render_help_text(frame: &mut Frame, area: Rect, view: View) {
    let hint = match view {
        View::Forecast => " Tab: next view │ 1-4/←→: metric │ r: refresh │ ?: help │ q: quit",
        _ => " Tab: next view │ r: refresh │ ?: help │ q: quit",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(colors::MUTED))),
        area,
    );
}

fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(colors::HEADER),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::MUTED))
}

fn labelled_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {}: ", label),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(
            value,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "--".to_string(),
    }
}

/// Formats the observation time in the local timezone, e.g. "7/15/2024, 02:00 PM +06:00"
fn format_local_datetime(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %I:%M %p %Z")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}
