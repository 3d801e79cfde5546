//! Airwatch Library
//!
//! This module exposes the dashboard's data, refresh, and rendering modules
//! for use by the binary and the integration tests.

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod history;
pub mod logging;
pub mod refresh;
pub mod ui;
