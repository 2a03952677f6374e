//! Unified error types for the flight software.
//!
//! A single `Error` enum that every adapter converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy`.
//! Rejected commands are *not* errors: they are counted by the flight
//! service and never surface here.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible adapter operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The command interface failed.
    Comms(CommsError),
    /// Configuration is unusable by an adapter.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The local address could not be bound.
    BindFailed,
    /// A socket option (receive timeout) could not be applied.
    SocketOption,
    /// `recv_from` failed with something other than a timeout.
    ReceiveFailed,
    /// `send_to` failed.
    SendFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "socket bind failed"),
            Self::SocketOption => write!(f, "setting socket options failed"),
            Self::ReceiveFailed => write!(f, "receive failed"),
            Self::SendFailed => write!(f, "send failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
