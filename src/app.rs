//! Application state management for Airwatch
//!
//! This module holds everything the dashboard displays, applies messages from
//! the refresh loop, and handles keyboard input.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::chart::{self, ChartData};
use crate::cli::StartupConfig;
use crate::data::{load_predictions, ForecastMetric, HistoryPoint, NormalizedReading, Prediction};
use crate::history::RollingHistory;
use crate::refresh::RefreshMessage;

/// Application state enum representing the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first fetch to finish
    Loading,
    /// At least one fetch has completed (successfully or not)
    Dashboard,
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Current,
    Trend,
    Forecast,
    Prediction,
}

impl View {
    pub const ALL: [View; 4] = [View::Current, View::Trend, View::Forecast, View::Prediction];

    pub fn title(&self) -> &'static str {
        match self {
            View::Current => "Current",
            View::Trend => "Trend",
            View::Forecast => "Forecast",
            View::Prediction => "Prediction",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current screen
    pub state: AppState,
    /// Selected dashboard tab
    pub view: View,
    /// Metric shown in the forecast tab
    pub forecast_metric: ForecastMetric,
    /// Last successfully fetched reading
    pub reading: Option<NormalizedReading>,
    /// Message from the most recent failed fetch, cleared on success
    pub error: Option<String>,
    /// Recent AQI values for the trend chart
    pub history: RollingHistory,
    /// Loaded PM2.5 predictions, if a file was given
    pub prediction: Option<Prediction>,
    /// Why the prediction file could not be loaded
    pub prediction_error: Option<String>,
    /// A fetch is in progress
    pub refreshing: bool,
    /// Local time of the last successful update
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self {
            state: AppState::Loading,
            view: View::Current,
            forecast_metric: ForecastMetric::Pm25,
            reading: None,
            error: None,
            history: RollingHistory::new(),
            prediction: None,
            prediction_error: None,
            refreshing: false,
            last_refresh: None,
            refresh_requested: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// Loads the prediction file if one was configured; a load failure is
    /// shown in the prediction tab rather than aborting startup.
    pub fn with_startup_config(config: &StartupConfig) -> Self {
        let mut app = Self::new();

        if let Some(path) = &config.predictions_path {
            match load_predictions(path) {
                Ok(prediction) => app.prediction = Some(prediction),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "{}", err);
                    app.prediction_error = Some(err.to_string());
                }
            }
        }

        app
    }

    /// Applies a message from the refresh loop
    ///
    /// A success replaces the reading wholesale, clears the error, and adds a
    /// history point. A failure only records the message; the previous
    /// reading and the history stay as they were.
    pub fn apply_refresh_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::RefreshStarted => {
                self.refreshing = true;
            }
            RefreshMessage::ReadingUpdated(reading) => {
                self.history.push(HistoryPoint::from(&reading));
                self.reading = Some(reading);
                self.error = None;
                self.refreshing = false;
                self.last_refresh = Some(Local::now());
                self.state = AppState::Dashboard;
            }
            RefreshMessage::RefreshError(message) => {
                self.error = Some(message);
                self.refreshing = false;
                self.state = AppState::Dashboard;
            }
        }
    }

    /// Returns and clears the pending refresh request
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// AQI trend chart for the rolling history
    pub fn trend_chart(&self) -> ChartData {
        chart::trend_chart(self.history.iter())
    }

    /// Forecast chart for the selected metric, if the station sent that metric
    pub fn forecast_chart(&self) -> Option<ChartData> {
        let forecast = self.reading.as_ref()?.forecast.as_ref()?;
        let points = forecast.daily.metric(self.forecast_metric);
        if points.is_empty() {
            return None;
        }
        Some(chart::forecast_chart(self.forecast_metric, points))
    }

    /// Metrics with at least one forecast day
    pub fn available_forecast_metrics(&self) -> Vec<ForecastMetric> {
        let Some(forecast) = self.reading.as_ref().and_then(|r| r.forecast.as_ref()) else {
            return Vec::new();
        };
        ForecastMetric::ALL
            .into_iter()
            .filter(|m| !forecast.daily.metric(*m).is_empty())
            .collect()
    }

    pub fn prediction_chart(&self) -> Option<ChartData> {
        self.prediction.as_ref().map(chart::prediction_chart)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Tab`/`Shift-Tab`: Next/previous tab
    /// - `1`-`4`, `←`/`→`/`h`/`l`: Pick the forecast metric (Forecast tab)
    /// - `r`: Refresh now
    /// - `?`: Toggle help
    /// - `Esc`: Close help, otherwise quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.refresh_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ if self.state == AppState::Loading => {}
            KeyCode::Tab => {
                self.view = self.view.next();
            }
            KeyCode::BackTab => {
                self.view = self.view.previous();
            }
            code if self.view == View::Forecast => self.handle_forecast_key(code),
            _ => {}
        }
    }

    fn handle_forecast_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => self.forecast_metric = ForecastMetric::O3,
            KeyCode::Char('2') => self.forecast_metric = ForecastMetric::Pm10,
            KeyCode::Char('3') => self.forecast_metric = ForecastMetric::Pm25,
            KeyCode::Char('4') => self.forecast_metric = ForecastMetric::Uvi,
            KeyCode::Right | KeyCode::Char('l') => {
                self.forecast_metric = self.forecast_metric.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.forecast_metric = self.forecast_metric.previous();
            }
            _ => {}
        }
    }
}
