//! Core data models for Airwatch
//!
//! This module contains the display model produced from each feed response:
//! the current reading, its pollutant and weather values, the daily forecast
//! block, and the points kept in the rolling AQI history.

pub mod aqi;
pub mod prediction;
pub mod waqi;

pub use aqi::AqiCategory;
pub use prediction::{load_predictions, Prediction, PredictionError};
pub use waqi::{normalize, parse_payload, AirQualitySource, FetchError, RawReading, WaqiClient};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where to ask the feed for readings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Location {
    /// Let the feed resolve the nearest station from the caller's IP
    #[default]
    Here,
    /// Nearest station to the given coordinates
    Geo { lat: f64, lon: f64 },
}

impl Location {
    /// Path segment used in the feed URL (`here` or `@{lat};{lon}`)
    pub fn path_segment(&self) -> String {
        match self {
            Location::Here => "here".to_string(),
            Location::Geo { lat, lon } => format!("@{};{}", lat, lon),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Here => write!(f, "current location"),
            Location::Geo { lat, lon } => write!(f, "{:.4}, {:.4}", lat, lon),
        }
    }
}

/// Latitude/longitude pair of the reporting station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Individual pollutant readings. A field is `None` when the station did not report it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

impl Pollutants {
    /// Returns the reported pollutants as `(code, value)` pairs, skipping absent ones
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("pm25", self.pm25),
            ("pm10", self.pm10),
            ("o3", self.o3),
            ("no2", self.no2),
            ("so2", self.so2),
            ("co", self.co),
        ]
        .into_iter()
        .filter_map(|(code, value)| value.map(|v| (code, v)))
        .collect()
    }
}

/// Weather values reported alongside the pollutants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadings {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
}

/// One day of a forecast metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Day label as sent by the feed (e.g. "2024-07-15")
    pub day: String,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

/// Forecast metrics published by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastMetric {
    O3,
    Pm10,
    Pm25,
    Uvi,
}

impl ForecastMetric {
    /// All metrics in display order
    pub const ALL: [ForecastMetric; 4] = [
        ForecastMetric::O3,
        ForecastMetric::Pm10,
        ForecastMetric::Pm25,
        ForecastMetric::Uvi,
    ];

    /// Short label used in tabs and the help overlay
    pub fn short_name(&self) -> &'static str {
        match self {
            ForecastMetric::O3 => "O₃",
            ForecastMetric::Pm10 => "PM10",
            ForecastMetric::Pm25 => "PM2.5",
            ForecastMetric::Uvi => "UVI",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Daily forecast arrays, kept in the order the feed sent them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub o3: Vec<ForecastPoint>,
    #[serde(default)]
    pub pm10: Vec<ForecastPoint>,
    #[serde(default)]
    pub pm25: Vec<ForecastPoint>,
    #[serde(default)]
    pub uvi: Vec<ForecastPoint>,
}

impl DailyForecast {
    /// Returns the points for a single metric
    pub fn metric(&self, metric: ForecastMetric) -> &[ForecastPoint] {
        match metric {
            ForecastMetric::O3 => &self.o3,
            ForecastMetric::Pm10 => &self.pm10,
            ForecastMetric::Pm25 => &self.pm25,
            ForecastMetric::Uvi => &self.uvi,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub daily: DailyForecast,
}

/// The display model for one successful fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReading {
    /// Overall Air Quality Index
    pub aqi: f64,
    /// Station / city name
    pub location: String,
    pub coordinates: Coordinates,
    /// ISO-8601 observation time, exactly as sent by the feed
    pub timestamp: String,
    pub pollutants: Pollutants,
    pub weather: WeatherReadings,
    /// Daily forecast, if the station publishes one
    pub forecast: Option<Forecast>,
}

impl NormalizedReading {
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }
}

/// A single entry of the rolling AQI history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub aqi: f64,
}

impl From<&NormalizedReading> for HistoryPoint {
    fn from(reading: &NormalizedReading) -> Self {
        Self {
            timestamp: reading.timestamp.clone(),
            aqi: reading.aqi,
        }
    }
}
