//! Command-line interface parsing for Airwatch
//!
//! This module handles parsing of CLI arguments using clap. Every option can
//! also come from the environment, so the API token never has to appear on
//! the command line.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::waqi::WAQI_BASE_URL;
use crate::data::Location;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid coordinates: latitude {lat} must be within [-90, 90] and longitude {lon} within [-180, 180]")]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// Empty API token
    #[error("Missing API token: pass --token or set WAQI_TOKEN")]
    MissingToken,
}

/// Airwatch - Live air quality dashboard
#[derive(Parser, Debug)]
#[command(name = "airwatch")]
#[command(about = "Live air quality, pollutant readings, and AQI forecasts in your terminal")]
#[command(version)]
pub struct Cli {
    /// WAQI API token
    #[arg(long, env = "WAQI_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Latitude of the location to monitor (defaults to IP-based location)
    #[arg(long, env = "AIRWATCH_LAT", requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the location to monitor
    #[arg(long, env = "AIRWATCH_LON", requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Base URL of the WAQI feed API
    #[arg(long, env = "AIRWATCH_BASE_URL", default_value = WAQI_BASE_URL)]
    pub base_url: String,

    /// JSON file with PM2.5 predictions ({"dates": [...], "predictions": [...]})
    #[arg(long, env = "AIRWATCH_PREDICTIONS", value_name = "FILE")]
    pub predictions: Option<PathBuf>,

    /// Write logs to this file (the terminal is used by the dashboard)
    #[arg(long, env = "AIRWATCH_LOG", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub token: String,
    pub location: Location,
    pub base_url: String,
    pub predictions_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Builds a location from optional coordinates.
///
/// # Returns
/// * `Ok(Location::Here)` if no coordinates were given
/// * `Ok(Location::Geo)` if both are within range
/// * `Err(CliError::InvalidCoordinates)` otherwise
pub fn parse_location(lat: Option<f64>, lon: Option<f64>) -> Result<Location, CliError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                Ok(Location::Geo { lat, lon })
            } else {
                Err(CliError::InvalidCoordinates { lat, lon })
            }
        }
        _ => Ok(Location::Here),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.token.trim().is_empty() {
            return Err(CliError::MissingToken);
        }

        Ok(StartupConfig {
            token: cli.token.clone(),
            location: parse_location(cli.lat, cli.lon)?,
            base_url: cli.base_url.clone(),
            predictions_path: cli.predictions.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}
