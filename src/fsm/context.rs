//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that mode handlers read from and
//! write to.  It holds the telemetry counters, the mission clock as of the
//! current iteration, the shutdown flag and the configuration.

use core::time::Duration;

use crate::config::FswConfig;

// ---------------------------------------------------------------------------
// Telemetry counters
// ---------------------------------------------------------------------------

/// Bookkeeping counters exposed to the ground as telemetry.
///
/// Only the flight service and the mode handlers mutate these.  All
/// arithmetic wraps; the escalation checks compare for exact equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Commands that passed validation.
    pub commands_accepted: u16,
    /// Rejections since the last EnableSafeMode/DisableSafeMode.
    pub commands_rejected: u8,
    /// Lifetime transitions into SAFE_MODE, commanded or automatic.
    pub safe_mode_entries: u16,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler function.
pub struct FsmContext {
    // -- Counters --
    pub counters: Counters,

    // -- Timing --
    /// Mission elapsed time, refreshed by the service before each tick and
    /// each command.
    pub elapsed: Duration,

    // -- Lifecycle --
    /// Set by the Shutdown command; checked at the top of each loop
    /// iteration.
    pub shutdown_requested: bool,

    // -- Configuration --
    pub config: FswConfig,
}

impl FsmContext {
    /// Create a new context with zeroed counters.
    pub fn new(config: FswConfig) -> Self {
        Self {
            counters: Counters::default(),
            elapsed: Duration::ZERO,
            shutdown_requested: false,
            config,
        }
    }

    /// Warm-up delay before RESTARTING hands over to READY.
    pub fn warmup(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.warmup_secs))
    }

    /// Whole seconds of mission elapsed time, as reported by `GetUptime`.
    pub fn elapsed_secs(&self) -> i64 {
        i64::try_from(self.elapsed.as_secs()).unwrap_or(i64::MAX)
    }
}
