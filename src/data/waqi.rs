//! WAQI feed API client
//!
//! This module fetches station readings from the World Air Quality Index feed
//! (`{base}/{location}/?token=...`) and normalizes them into our
//! [`NormalizedReading`] display model.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{
    Coordinates, DailyForecast, Forecast, Location, NormalizedReading, Pollutants,
    WeatherReadings,
};

/// Base URL for the WAQI feed API
pub const WAQI_BASE_URL: &str = "https://api.waqi.info/feed";

/// Errors that can occur when fetching a reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport failure or non-2xx status
    #[error("Network error: {0}")]
    Network(String),

    /// Body was not JSON, did not match the feed shape, or status was not "ok"
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidResponse(err.to_string())
    }
}

/// Anything that can produce a normalized reading for a location.
///
/// The refresh loop is generic over this so tests can script results.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<NormalizedReading, FetchError>;
}

/// Client for fetching readings from the WAQI feed
#[derive(Debug, Clone)]
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl WaqiClient {
    /// Create a new WaqiClient for the public feed
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: WAQI_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    /// Create a new WaqiClient with a custom HTTP client
    pub fn with_client(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: WAQI_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at a different feed base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the feed URL for a location
    pub fn feed_url(&self, location: &Location) -> String {
        format!(
            "{}/{}/?token={}",
            self.base_url,
            location.path_segment(),
            self.token
        )
    }

    /// Fetch and normalize the current reading for a location
    ///
    /// # Returns
    /// * `Ok(NormalizedReading)` - The normalized station reading
    /// * `Err(FetchError::Network)` - If the request failed or the status was not 2xx
    /// * `Err(FetchError::InvalidResponse)` - If the body could not be normalized
    pub async fn fetch_reading(&self, location: &Location) -> Result<NormalizedReading, FetchError> {
        tracing::debug!(%location, "requesting air quality feed");

        let response = self.client.get(self.feed_url(location)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "feed returned HTTP {}",
                status
            )));
        }

        let text = response.text().await?;
        parse_payload(&text)
    }
}

#[async_trait]
impl AirQualitySource for WaqiClient {
    async fn fetch(&self, location: &Location) -> Result<NormalizedReading, FetchError> {
        self.fetch_reading(location).await
    }
}

/// Parses a feed response body and normalizes it
pub fn parse_payload(body: &str) -> Result<NormalizedReading, FetchError> {
    let raw: RawReading = serde_json::from_str(body)?;
    normalize(raw)
}

/// Converts a raw feed payload into the display model
///
/// Only the status flag and the station shape can fail; pollutant and weather
/// codes the station did not report stay `None`.
pub fn normalize(raw: RawReading) -> Result<NormalizedReading, FetchError> {
    if raw.status != "ok" {
        // On errors the feed puts a message string in `data`
        let reason = raw
            .data
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("status \"{}\"", raw.status));
        return Err(FetchError::InvalidResponse(reason));
    }

    let station: RawStation = serde_json::from_value(raw.data)?;
    let iaqi = station.iaqi;

    Ok(NormalizedReading {
        aqi: station.aqi,
        location: station.city.name,
        coordinates: Coordinates {
            lat: station.city.geo.0,
            lon: station.city.geo.1,
        },
        timestamp: station.time.iso,
        pollutants: Pollutants {
            pm25: value_of(&iaqi.pm25),
            pm10: value_of(&iaqi.pm10),
            o3: value_of(&iaqi.o3),
            no2: value_of(&iaqi.no2),
            so2: value_of(&iaqi.so2),
            co: value_of(&iaqi.co),
        },
        weather: WeatherReadings {
            temperature: value_of(&iaqi.t),
            humidity: value_of(&iaqi.h),
        },
        forecast: station.forecast.map(|forecast| Forecast {
            daily: forecast.daily,
        }),
    })
}

fn value_of(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().map(|v| v.v)
}

/// Top-level feed response
#[derive(Debug, Deserialize)]
pub struct RawReading {
    pub status: String,
    /// Station object when `status == "ok"`, otherwise an error message
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Station data inside an "ok" response
#[derive(Debug, Deserialize)]
struct RawStation {
    aqi: f64,
    city: RawCity,
    time: RawTime,
    #[serde(default)]
    iaqi: RawIaqi,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    geo: (f64, f64),
}

#[derive(Debug, Deserialize)]
struct RawTime {
    iso: String,
}

/// Individual readings keyed by pollutant / weather code
#[derive(Debug, Default, Deserialize)]
struct RawIaqi {
    pm25: Option<RawValue>,
    pm10: Option<RawValue>,
    o3: Option<RawValue>,
    no2: Option<RawValue>,
    so2: Option<RawValue>,
    co: Option<RawValue>,
    t: Option<RawValue>,
    h: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    v: f64,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    daily: DailyForecast,
}
