//! Background data refresh system
//!
//! Polls an [`AirQualitySource`] on a fixed interval and sends the results to
//! the main application over a tokio channel. Only one fetch is ever in
//! flight: the loop awaits each fetch before waiting for the next tick.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::data::{AirQualitySource, Location, NormalizedReading};

/// Messages sent from background refresh to main app
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A fetch cycle is starting
    RefreshStarted,
    /// A fetch succeeded
    ReadingUpdated(NormalizedReading),
    /// A fetch failed; the message is meant for display
    RefreshError(String),
}

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between scheduled fetches
    pub interval: Duration,
    /// Location to fetch readings for
    pub location: Location,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300), // 5 minutes
            location: Location::Here,
        }
    }
}

/// Handle for controlling the background refresh system
///
/// Dropping the handle aborts the loop.
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Signals shutdown; closing it also stops the loop
    shutdown_tx: mpsc::Sender<()>,
    /// Manual refresh requests, capacity 1 so bursts collapse
    refresh_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Creates a new RefreshHandle and spawns the background refresh task
    ///
    /// The first fetch happens immediately, then once per `config.interval`.
    ///
    /// # Arguments
    /// * `source` - Where readings come from
    /// * `config` - Interval and location for the loop
    pub fn spawn<S>(source: S, config: RefreshConfig) -> Self
    where
        S: AirQualitySource + 'static,
    {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let (refresh_tx, refresh_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(run_loop(source, config, msg_tx, shutdown_rx, refresh_rx));

        Self {
            receiver: msg_rx,
            shutdown_tx,
            refresh_tx,
            task: Some(task),
        }
    }

    /// Requests an immediate refresh
    ///
    /// If a fetch is already running the request waits for it to finish;
    /// repeated requests in the meantime are dropped.
    pub fn request_refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Returns true while the background loop is running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Shuts down the background refresh task
    ///
    /// Returns once the loop has exited; no fetch starts after this resolves.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.try_send(());
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!("refresh task ended abnormally: {}", err);
            }
        }
        tracing::debug!("refresh loop stopped");
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Checks for pending refresh messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}

async fn run_loop<S>(
    source: S,
    config: RefreshConfig,
    tx: mpsc::Sender<RefreshMessage>,
    mut shutdown_rx: mpsc::Receiver<()>,
    mut refresh_rx: mpsc::Receiver<()>,
) where
    S: AirQualitySource,
{
    let mut interval = tokio::time::interval(config.interval);
    // A slow fetch pushes the schedule back instead of firing missed ticks in a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        location = %config.location,
        interval_secs = config.interval.as_secs(),
        "refresh loop started"
    );

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            _ = interval.tick() => {}
            Some(()) = refresh_rx.recv() => {
                tracing::debug!("manual refresh requested");
                interval.reset();
            }
        }

        if !deliver(&tx, &mut shutdown_rx, RefreshMessage::RefreshStarted).await {
            break;
        }

        let message = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            result = source.fetch(&config.location) => match result {
                Ok(reading) => {
                    tracing::info!(
                        station = %reading.location,
                        aqi = reading.aqi,
                        "air quality updated"
                    );
                    RefreshMessage::ReadingUpdated(reading)
                }
                Err(err) => {
                    tracing::warn!("air quality fetch failed: {}", err);
                    RefreshMessage::RefreshError(err.to_string())
                }
            },
        };

        if !deliver(&tx, &mut shutdown_rx, message).await {
            break;
        }
    }
}

/// Sends a message unless shutdown arrives first
///
/// Returns false when the loop should stop: shutdown was signalled or the
/// receiver is gone. A full channel never blocks shutdown.
async fn deliver(
    tx: &mpsc::Sender<RefreshMessage>,
    shutdown_rx: &mut mpsc::Receiver<()>,
    message: RefreshMessage,
) -> bool {
    tokio::select! {
        biased;
        _ = shutdown_rx.recv() => false,
        sent = tx.send(message) => sent.is_ok(),
    }
}
