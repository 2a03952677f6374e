//! Command and telemetry-reply codec.
//!
//! Request wire format — exactly one byte:
//! ```text
//! ┌──────────────┐
//! │ command (1B) │
//! └──────────────┘
//! ```
//!
//! Reply wire format — payload, optional shutdown marker, then mode:
//! ```text
//! ┌───────────────────────┬──────────────┬───────────┐
//! │ payload (0 / 2 / 8 B) │ 0xFF (0/1 B) │ mode (1B) │
//! │ little-endian         │ Shutdown only│           │
//! └───────────────────────┴──────────────┴───────────┘
//! ```
//!
//! Payload widths: counters are `u16`, uptime is `i64` seconds.  A rejected
//! command replies with the mode byte alone, exactly like an accepted
//! command without a payload.

use crate::app::commands::Command;
use crate::fsm::OperatingMode;

/// Byte inserted before the mode byte when the Shutdown command is accepted.
pub const SHUTDOWN_MARKER: u8 = 0xFF;

/// Largest reply the flight side can produce: 8-byte uptime plus mode.
pub const MAX_REPLY_LEN: usize = 9;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Outcome of decoding one command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Known(Command),
    /// Not a command.  Routed to rejection handling, never an error.
    Unrecognized(u8),
}

/// Decode a command byte.  Total: every byte maps to exactly one outcome.
pub const fn decode(byte: u8) -> Decoded {
    match byte {
        0x0C => Decoded::Known(Command::EnableSafeMode),
        0x12 => Decoded::Known(Command::DisableSafeMode),
        0x2C => Decoded::Known(Command::GetCommandsReceived),
        0x38 => Decoded::Known(Command::GetSafeModeCount),
        0x4C => Decoded::Known(Command::GetUptime),
        0x5C => Decoded::Known(Command::ResetCommandCount),
        0x60 => Decoded::Known(Command::Shutdown),
        other => Decoded::Unrecognized(other),
    }
}

// ---------------------------------------------------------------------------
// Reply assembly
// ---------------------------------------------------------------------------

/// Append-only reply builder, one per request.
#[derive(Debug, Default)]
pub struct ReplyBuilder {
    buf: Vec<u8>,
}

impl ReplyBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(MAX_REPLY_LEN),
        }
    }

    pub fn push_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_shutdown_marker(&mut self) {
        self.buf.push(SHUTDOWN_MARKER);
    }

    /// Seal the reply with the post-effect mode byte.
    pub fn finish(mut self, mode: OperatingMode) -> Reply {
        self.buf.push(mode.wire_value());
        Reply(self.buf)
    }
}

/// A complete telemetry reply, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply(Vec<u8>);

impl Reply {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Reply parsing (ground side)
// ---------------------------------------------------------------------------

impl Reply {
    /// Interpret the reply to `sent` (ground side).
    ///
    /// `sent` is `None` when the request byte was not a known command; only
    /// a bare mode byte is then acceptable.
    pub fn parse(sent: Option<Command>, bytes: &[u8]) -> Result<ParsedReply, ReplyError> {
        let (&mode_byte, body) = bytes.split_last().ok_or(ReplyError::Empty)?;
        let mode = OperatingMode::from_wire(mode_byte).ok_or(ReplyError::UnknownMode(mode_byte))?;

        let body = match (sent, body) {
            (_, []) => ReplyBody::Bare,
            (Some(Command::Shutdown), [SHUTDOWN_MARKER]) => ReplyBody::ShuttingDown,
            (Some(Command::GetCommandsReceived | Command::GetSafeModeCount), &[lo, hi]) => {
                ReplyBody::Count(u16::from_le_bytes([lo, hi]))
            }
            (Some(Command::GetUptime), body) if body.len() == 8 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(body);
                ReplyBody::UptimeSecs(i64::from_le_bytes(raw))
            }
            (_, body) => return Err(ReplyError::UnexpectedLength(body.len() + 1)),
        };

        Ok(ParsedReply { sent, body, mode })
    }
}

/// What preceded the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyBody {
    /// Mode byte only.
    Bare,
    /// `GetCommandsReceived` / `GetSafeModeCount` value.
    Count(u16),
    /// `GetUptime` value.
    UptimeSecs(i64),
    /// Shutdown marker.
    ShuttingDown,
}

/// A decoded telemetry reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedReply {
    pub sent: Option<Command>,
    pub body: ReplyBody,
    pub mode: OperatingMode,
}

impl ParsedReply {
    /// Whether the flight side accepted the command.
    ///
    /// Rejections carry no marker on the wire; they are recognised by the
    /// absence of the payload the command would have produced.  Commands
    /// without a payload are indistinguishable from rejections and report
    /// `None`.
    pub fn accepted(&self) -> Option<bool> {
        match (self.sent, self.body) {
            (None, _) => Some(false),
            (_, ReplyBody::Count(_) | ReplyBody::UptimeSecs(_) | ReplyBody::ShuttingDown) => {
                Some(true)
            }
            (Some(cmd), ReplyBody::Bare)
                if cmd == Command::Shutdown || cmd.payload_description().is_some() =>
            {
                Some(false)
            }
            (Some(_), ReplyBody::Bare) => None,
        }
    }
}

/// Malformed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyError {
    Empty,
    /// The trailing byte is not a mode value.
    UnknownMode(u8),
    /// Total length does not fit the command that was sent.
    UnexpectedLength(usize),
}

impl core::fmt::Display for ReplyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty reply"),
            Self::UnknownMode(b) => write!(f, "unknown mode byte 0x{b:02X}"),
            Self::UnexpectedLength(n) => write!(f, "unexpected reply length {n}"),
        }
    }
}

impl std::error::Error for ReplyError {}
