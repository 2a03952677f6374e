//! System configuration parameters
//!
//! All tunable parameters for the flight software.
//! Values can be overridden from a JSON file via [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FswConfig {
    // --- Command interface ---
    /// Local address the command socket binds to
    pub bind_addr: String,
    /// UDP port of the command interface
    pub listen_port: u16,
    /// Bounded wait for an inbound command per loop iteration (milliseconds)
    pub recv_timeout_ms: u32,

    // --- Modes ---
    /// Delay from mission start before RESTARTING hands over to READY (seconds)
    pub warmup_secs: u32,
    /// Consecutive rejections in READY that trigger SAFE_MODE
    pub ready_rejection_limit: u8,
    /// Consecutive rejections in SAFE_MODE that trigger BBQ_MODE
    pub safe_rejection_limit: u8,

    // --- Telemetry ---
    /// Periodic telemetry event interval (seconds, 0 = disabled)
    pub telemetry_interval_secs: u32,
}

impl Default for FswConfig {
    fn default() -> Self {
        Self {
            // Command interface
            bind_addr: "0.0.0.0".into(),
            listen_port: 8080,
            recv_timeout_ms: 200,

            // Modes
            warmup_secs: 10,
            ready_rejection_limit: 5,
            safe_rejection_limit: 3,

            // Telemetry
            telemetry_interval_secs: 60, // 1/min
        }
    }
}

impl FswConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("bind_addr must not be empty"));
        }
        if !(1..=60_000).contains(&self.recv_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "recv_timeout_ms must be 1–60000",
            ));
        }
        if self.warmup_secs > 3600 {
            return Err(ConfigError::ValidationFailed("warmup_secs must be 0–3600"));
        }
        if self.ready_rejection_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "ready_rejection_limit must be at least 1",
            ));
        }
        if self.safe_rejection_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "safe_rejection_limit must be at least 1",
            ));
        }
        Ok(())
    }
}
