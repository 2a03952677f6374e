//! Host time adapter.
//!
//! Provides monotonic time for the flight service via
//! `std::time::Instant`, anchored at adapter construction.

use core::time::Duration;
use std::time::Instant;

use crate::app::ports::ClockPort;

/// Monotonic clock anchored at construction.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for MonotonicClock {
    fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}
