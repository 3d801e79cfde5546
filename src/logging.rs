//! Log setup
//!
//! The dashboard owns the terminal, so logs go to a file or nowhere.
//! `RUST_LOG` selects the level (default `info`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install logger: {0}")]
    Init(String),
}

/// Installs a global subscriber writing to `log_file`, if given
///
/// Returns `Ok(false)` when no file was configured and nothing was installed.
pub fn init(log_file: Option<&Path>) -> Result<bool, LoggingError> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(true)
}
