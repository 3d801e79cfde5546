//! PM2.5 prediction file loader
//!
//! Predictions are produced offline and written as
//! `{"dates": ["2024-07-16", ...], "predictions": [41.2, ...]}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a prediction file
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Failed to read the file
    #[error("Failed to read prediction file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse prediction file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Dates and values do not line up
    #[error("Prediction file has {dates} dates but {values} values")]
    LengthMismatch { dates: usize, values: usize },
}

/// Daily PM2.5 predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// ISO dates (`YYYY-MM-DD`), one per prediction
    pub dates: Vec<String>,
    /// Predicted PM2.5 in µg/m³
    pub predictions: Vec<f64>,
}

impl Prediction {
    /// Parses and validates prediction JSON
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        let prediction: Prediction = serde_json::from_str(json)?;
        if prediction.dates.len() != prediction.predictions.len() {
            return Err(PredictionError::LengthMismatch {
                dates: prediction.dates.len(),
                values: prediction.predictions.len(),
            });
        }
        Ok(prediction)
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Reads a prediction file from disk
pub fn load_predictions(path: &Path) -> Result<Prediction, PredictionError> {
    let contents = fs::read_to_string(path)?;
    let prediction = Prediction::from_json(&contents)?;
    tracing::info!(
        path = %path.display(),
        days = prediction.len(),
        "loaded predictions"
    );
    Ok(prediction)
}
