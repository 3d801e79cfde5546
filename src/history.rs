//! Rolling AQI history
//!
//! Keeps the most recent readings for the trend chart. Lives only for the
//! session; nothing is written to disk.

use std::collections::VecDeque;

use crate::data::HistoryPoint;

/// Number of points kept in the trend window
pub const HISTORY_CAPACITY: usize = 24;

/// Fixed-capacity FIFO of history points, oldest first
#[derive(Debug, Clone)]
pub struct RollingHistory {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Creates a window holding at most `capacity` points (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a point, evicting the oldest once the window is full
    pub fn push(&mut self, point: HistoryPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }
}
