//! Outbound application events.
//!
//! The [`FlightService`](super::service::FlightService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to the console, record in tests).

use super::commands::Command;
use crate::fsm::OperatingMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The mode changed, by command or by escalation.
    StateChanged {
        from: OperatingMode,
        to: OperatingMode,
    },

    /// A command passed validation and was executed.
    CommandAccepted {
        command: Command,
        mode: OperatingMode,
    },

    /// A command byte was rejected.  `mode` is the mode it was checked against.
    CommandRejected {
        raw: u8,
        reason: RejectReason,
        mode: OperatingMode,
    },

    /// The Shutdown command was accepted.
    ShutdownRequested,

    /// The flight service has started (carries initial mode).
    Started(OperatingMode),
}

/// Why a command byte was turned into `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The byte is not a known command.
    Unrecognized,
    /// The command is known but forbidden in the current mode.
    IllegalInMode(Command),
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "unrecognized"),
            Self::IllegalInMode(cmd) => write!(f, "{cmd} illegal in current mode"),
        }
    }
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub mode: OperatingMode,
    pub commands_accepted: u16,
    pub commands_rejected: u8,
    pub safe_mode_entries: u16,
    pub uptime_secs: i64,
}
