//! Chart data shaping
//!
//! Turns history points, forecast arrays, and predictions into labelled
//! series ready for a line-chart renderer. Nothing here knows about the
//! terminal; see `ui::chart_view` for the ratatui renderer.
//!
//! Every series has exactly one value per input element. Missing days are
//! never filled in and values are never smoothed.

use chrono::{DateTime, Local, NaiveDate};

use crate::data::{ForecastMetric, ForecastPoint, HistoryPoint, Prediction};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Line stroke of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPattern {
    Solid,
    /// Dashed line with `dash` units drawn and `gap` units skipped
    Dashed { dash: u8, gap: u8 },
}

/// Styling applied to one series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Line color
    pub color: Rgb,
    /// Opacity of the point/area color, 255 = opaque
    pub alpha: u8,
    pub dash: DashPattern,
    /// Fill the area under the line
    pub fill: bool,
}

/// A labelled series of values
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
    Bottom,
}

/// Display configuration handed to the renderer alongside the data
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub y_axis_title: String,
    pub legend: LegendPosition,
    /// Start the y-axis at zero instead of the smallest value
    pub begin_at_zero: bool,
}

/// Everything a renderer needs to draw one line chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// X-axis labels, one per value in each series
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
    pub options: ChartOptions,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Trend line color
pub const TREND_COLOR: Rgb = Rgb::new(75, 192, 192);
/// Prediction line color
pub const PREDICTION_COLOR: Rgb = Rgb::new(255, 99, 132);

const MAX_ALPHA: u8 = 0x88;
const MIN_ALPHA: u8 = 0x44;
/// About 10% opacity
const PREDICTION_FILL_ALPHA: u8 = 26;

/// Base color for a forecast metric
pub fn metric_color(metric: ForecastMetric) -> Rgb {
    match metric {
        ForecastMetric::O3 => Rgb::new(75, 192, 192),
        ForecastMetric::Pm10 => Rgb::new(153, 102, 255),
        ForecastMetric::Pm25 => Rgb::new(255, 99, 132),
        ForecastMetric::Uvi => Rgb::new(255, 159, 64),
    }
}

/// Chart title for a forecast metric
pub fn metric_title(metric: ForecastMetric) -> &'static str {
    match metric {
        ForecastMetric::O3 => "Ozone (O₃) Forecast",
        ForecastMetric::Pm10 => "PM10 Forecast",
        ForecastMetric::Pm25 => "PM2.5 Forecast",
        ForecastMetric::Uvi => "UV Index Forecast",
    }
}

/// Builds the AQI trend chart from the rolling history
///
/// Labels are the local wall-clock time of each point.
pub fn trend_chart<'a, I>(points: I) -> ChartData
where
    I: IntoIterator<Item = &'a HistoryPoint>,
{
    let (labels, values): (Vec<String>, Vec<f64>) = points
        .into_iter()
        .map(|point| (format_local_time(&point.timestamp), point.aqi))
        .unzip();

    ChartData {
        labels,
        datasets: vec![ChartSeries {
            label: "Air Quality Index".to_string(),
            values,
            style: SeriesStyle {
                color: TREND_COLOR,
                alpha: u8::MAX,
                dash: DashPattern::Solid,
                fill: false,
            },
        }],
        options: ChartOptions {
            title: "AQI Trend".to_string(),
            y_axis_title: "AQI Value".to_string(),
            legend: LegendPosition::Top,
            begin_at_zero: true,
        },
    }
}

/// Builds the average/maximum/minimum chart for one forecast metric
///
/// The three series share the metric's color: the average is solid and
/// opaque, the maximum widely dashed, the minimum finely dashed.
pub fn forecast_chart(metric: ForecastMetric, points: &[ForecastPoint]) -> ChartData {
    let color = metric_color(metric);
    let labels = points.iter().map(|p| p.day.clone()).collect();

    let series = |label: &str, pick: fn(&ForecastPoint) -> f64, alpha: u8, dash: DashPattern| {
        ChartSeries {
            label: label.to_string(),
            values: points.iter().map(pick).collect(),
            style: SeriesStyle {
                color,
                alpha,
                dash,
                fill: false,
            },
        }
    };

    ChartData {
        labels,
        datasets: vec![
            series("Average", |p| p.avg, u8::MAX, DashPattern::Solid),
            series(
                "Maximum",
                |p| p.max,
                MAX_ALPHA,
                DashPattern::Dashed { dash: 5, gap: 5 },
            ),
            series(
                "Minimum",
                |p| p.min,
                MIN_ALPHA,
                DashPattern::Dashed { dash: 2, gap: 2 },
            ),
        ],
        options: ChartOptions {
            title: metric_title(metric).to_string(),
            y_axis_title: "Value".to_string(),
            legend: LegendPosition::Top,
            begin_at_zero: true,
        },
    }
}

/// Builds the PM2.5 prediction chart
pub fn prediction_chart(prediction: &Prediction) -> ChartData {
    ChartData {
        labels: prediction
            .dates
            .iter()
            .map(|date| format_local_date(date))
            .collect(),
        datasets: vec![ChartSeries {
            label: "PM2.5 Predictions".to_string(),
            values: prediction.predictions.clone(),
            style: SeriesStyle {
                color: PREDICTION_COLOR,
                alpha: PREDICTION_FILL_ALPHA,
                dash: DashPattern::Solid,
                fill: true,
            },
        }],
        options: ChartOptions {
            title: "PM2.5 7-Day Forecast".to_string(),
            y_axis_title: "PM2.5 (µg/m³)".to_string(),
            legend: LegendPosition::Top,
            begin_at_zero: false,
        },
    }
}

/// Formats an RFC 3339 timestamp as local time, e.g. "2:05:00 PM"
///
/// Unparseable input is returned unchanged so the label count still matches.
pub fn format_local_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Local).format("%-I:%M:%S %p").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Formats an ISO date as "7/16/2024"
///
/// Full timestamps are converted to the local date first. Unparseable input
/// is returned unchanged.
pub fn format_local_date(date: &str) -> String {
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.format("%-m/%-d/%Y").to_string();
    }
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.with_timezone(&Local).format("%-m/%-d/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast_point(day: &str, avg: f64, max: f64, min: f64) -> ForecastPoint {
        ForecastPoint {
            day: day.to_string(),
            avg,
            max,
            min,
        }
    }

    #[test]
    fn test_forecast_chart_two_days() {
        let points = vec![
            forecast_point("Mon", 10.0, 15.0, 5.0),
            forecast_point("Tue", 12.0, 18.0, 6.0),
        ];

        let chart = forecast_chart(ForecastMetric::Pm25, &points);

        assert_eq!(chart.labels, vec!["Mon", "Tue"]);
        assert_eq!(chart.datasets.len(), 3);
        assert!(chart.datasets.iter().all(|s| s.values.len() == 2));
        assert_eq!(chart.datasets[0].label, "Average");
        assert_eq!(chart.datasets[0].values, vec![10.0, 12.0]);
        assert_eq!(chart.datasets[1].label, "Maximum");
        assert_eq!(chart.datasets[1].values, vec![15.0, 18.0]);
        assert_eq!(chart.datasets[2].label, "Minimum");
        assert_eq!(chart.datasets[2].values, vec![5.0, 6.0]);
    }

    #[test]
    fn test_forecast_series_share_color_with_distinct_styles() {
        let points = vec![forecast_point("2024-07-15", 1.0, 2.0, 0.0)];
        let chart = forecast_chart(ForecastMetric::Pm10, &points);

        let color = metric_color(ForecastMetric::Pm10);
        assert!(chart.datasets.iter().all(|s| s.style.color == color));
        assert!(chart.datasets.iter().all(|s| !s.style.fill));

        let avg = chart.datasets[0].style;
        let max = chart.datasets[1].style;
        let min = chart.datasets[2].style;
        assert_eq!(avg.dash, DashPattern::Solid);
        assert_eq!(max.dash, DashPattern::Dashed { dash: 5, gap: 5 });
        assert_eq!(min.dash, DashPattern::Dashed { dash: 2, gap: 2 });
        assert!(avg.alpha > max.alpha && max.alpha > min.alpha);
    }

    #[test]
    fn test_forecast_chart_options() {
        let chart = forecast_chart(ForecastMetric::O3, &[]);
        assert_eq!(chart.options.title, "Ozone (O₃) Forecast");
        assert_eq!(chart.options.y_axis_title, "Value");
        assert_eq!(chart.options.legend, LegendPosition::Top);
        assert!(chart.options.begin_at_zero);
    }

    #[test]
    fn test_forecast_chart_empty_input() {
        let chart = forecast_chart(ForecastMetric::Uvi, &[]);
        assert!(chart.is_empty());
        assert_eq!(chart.datasets.len(), 3);
        assert!(chart.datasets.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn test_forecast_gap_is_not_filled() {
        // Wednesday missing from the source
        let points = vec![
            forecast_point("Mon", 1.0, 2.0, 0.0),
            forecast_point("Tue", 1.0, 2.0, 0.0),
            forecast_point("Thu", 3.0, 4.0, 2.0),
        ];

        let chart = forecast_chart(ForecastMetric::O3, &points);
        assert_eq!(chart.labels, vec!["Mon", "Tue", "Thu"]);
        assert_eq!(chart.datasets[0].values, vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_trend_chart_keeps_order_and_length() {
        let points = vec![
            HistoryPoint {
                timestamp: "2024-07-15T14:00:00Z".to_string(),
                aqi: 42.0,
            },
            HistoryPoint {
                timestamp: "2024-07-15T14:05:00Z".to_string(),
                aqi: 57.0,
            },
            HistoryPoint {
                timestamp: "2024-07-15T14:10:00Z".to_string(),
                aqi: 51.0,
            },
        ];

        let chart = trend_chart(&points);

        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].values, vec![42.0, 57.0, 51.0]);
        assert_eq!(chart.options.title, "AQI Trend");
        assert_eq!(chart.options.y_axis_title, "AQI Value");
        assert!(chart.options.begin_at_zero);
        assert_eq!(chart.datasets[0].style.color, TREND_COLOR);
    }

    #[test]
    fn test_trend_labels_are_local_times() {
        let timestamp = "2024-07-15T14:05:09Z";
        let chart = trend_chart(&[HistoryPoint {
            timestamp: timestamp.to_string(),
            aqi: 10.0,
        }]);

        let expected = DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Local)
            .format("%-I:%M:%S %p")
            .to_string();
        assert_eq!(chart.labels[0], expected);
        assert!(chart.labels[0].ends_with("AM") || chart.labels[0].ends_with("PM"));
    }

    #[test]
    fn test_trend_label_falls_back_to_raw_text() {
        let chart = trend_chart(&[HistoryPoint {
            timestamp: "yesterday".to_string(),
            aqi: 10.0,
        }]);
        assert_eq!(chart.labels, vec!["yesterday"]);
    }

    #[test]
    fn test_trend_chart_empty_history() {
        let chart = trend_chart(&Vec::<HistoryPoint>::new());
        assert!(chart.is_empty());
        assert!(chart.datasets[0].values.is_empty());
    }

    #[test]
    fn test_prediction_chart() {
        let prediction = Prediction {
            dates: vec!["2024-07-16".to_string(), "2024-07-17".to_string()],
            predictions: vec![41.2, 39.8],
        };

        let chart = prediction_chart(&prediction);

        assert_eq!(chart.labels, vec!["7/16/2024", "7/17/2024"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "PM2.5 Predictions");
        assert_eq!(chart.datasets[0].values, vec![41.2, 39.8]);
        assert!(chart.datasets[0].style.fill);
        assert!(!chart.options.begin_at_zero);
        assert_eq!(chart.options.y_axis_title, "PM2.5 (µg/m³)");
    }

    #[test]
    fn test_format_local_date_fallback() {
        assert_eq!(format_local_date("next week"), "next week");
    }

    #[test]
    fn test_metric_colors_distinct() {
        let colors: Vec<Rgb> = ForecastMetric::ALL.iter().map(|m| metric_color(*m)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
