//! Ports between the flight logic and the host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FlightService (domain)
//! ```
//!
//! Driven adapters (clock, event sinks, configuration storage) implement
//! these traits.  The [`FlightService`](super::service::FlightService)
//! consumes them via generics, so the domain core never touches the OS
//! directly.  The command transport port lives in
//! [`comms::transport`](crate::comms::transport) next to the wire codec.

use core::time::Duration;

use crate::config::FswConfig;

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
///
/// The service captures `uptime()` once as the mission start and measures
/// every later reading against it.
pub trait ClockPort {
    /// Time since an arbitrary fixed origin.  Must never go backwards.
    fn uptime(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// Receives every [`AppEvent`](super::events::AppEvent) the service raises.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration
// ───────────────────────────────────────────────────────────────

/// Configuration storage.
///
/// Implementations MUST validate with [`FswConfig::validate`] on both
/// paths.  Invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`FswConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<FswConfig, ConfigError>;

    /// Validate, then persist.
    fn save(&self, config: &FswConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

/// Why a configuration could not be loaded or stored.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// Range check failed; the message names the field.
    ValidationFailed(&'static str),
    /// Reading or writing the backing store failed.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
