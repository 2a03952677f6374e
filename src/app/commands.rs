//! Inbound commands to the flight service.
//!
//! The command set is closed.  Each command carries the list of modes in
//! which it must be rejected; legality is plain membership in that list.
//!
//! | Command             | Byte   | Illegal in              |
//! |---------------------|--------|-------------------------|
//! | EnableSafeMode      | `0x0C` | SAFE_MODE, BBQ_MODE     |
//! | DisableSafeMode     | `0x12` | READY, RESTARTING       |
//! | GetCommandsReceived | `0x2C` | RESTARTING              |
//! | GetSafeModeCount    | `0x38` | BBQ_MODE                |
//! | GetUptime           | `0x4C` | RESTARTING              |
//! | ResetCommandCount   | `0x5C` | RESTARTING              |
//! | Shutdown            | `0x60` | READY, RESTARTING       |

use crate::fsm::OperatingMode;

/// Commands the ground can send to the flight service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Enter SAFE_MODE and clear the rejection counter.
    EnableSafeMode = 0x0C,
    /// Return to READY and clear the rejection counter.
    DisableSafeMode = 0x12,
    /// Report the accepted-command counter (u16).
    GetCommandsReceived = 0x2C,
    /// Report the safe-mode entry counter (u16).
    GetSafeModeCount = 0x38,
    /// Report whole seconds since mission start (i64).
    GetUptime = 0x4C,
    /// Zero the accepted-command counter.
    ResetCommandCount = 0x5C,
    /// Stop the control loop after replying.
    Shutdown = 0x60,
}

impl Command {
    /// Every command, in ground-console order.
    pub const ALL: [Self; 7] = [
        Self::EnableSafeMode,
        Self::DisableSafeMode,
        Self::GetCommandsReceived,
        Self::GetSafeModeCount,
        Self::GetUptime,
        Self::ResetCommandCount,
        Self::Shutdown,
    ];

    /// Byte value of this command on the wire.
    pub const fn wire_byte(self) -> u8 {
        self as u8
    }

    /// Modes in which this command is rejected regardless of its effect.
    pub const fn illegal_modes(self) -> &'static [OperatingMode] {
        match self {
            Self::EnableSafeMode => &[OperatingMode::SafeMode, OperatingMode::BbqMode],
            Self::DisableSafeMode | Self::Shutdown => {
                &[OperatingMode::Ready, OperatingMode::Restarting]
            }
            Self::GetCommandsReceived | Self::GetUptime | Self::ResetCommandCount => {
                &[OperatingMode::Restarting]
            }
            Self::GetSafeModeCount => &[OperatingMode::BbqMode],
        }
    }

    /// `true` unless `mode` is in [`illegal_modes`](Self::illegal_modes).
    pub fn is_legal_in(self, mode: OperatingMode) -> bool {
        !self.illegal_modes().contains(&mode)
    }

    /// Upper-case name as shown on the ground console.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnableSafeMode => "SAFE_MODE_ENABLE",
            Self::DisableSafeMode => "SAFE_MODE_DISABLE",
            Self::GetCommandsReceived => "NUM_CMDS_RECEIVED",
            Self::GetSafeModeCount => "NUM_SAFE_MODES",
            Self::GetUptime => "SHOW_UP_TIME",
            Self::ResetCommandCount => "RESET_CMD_COUNT",
            Self::Shutdown => "SHUTDOWN",
        }
    }

    /// Human description of the value this command returns, if any.
    pub const fn payload_description(self) -> Option<&'static str> {
        match self {
            Self::GetCommandsReceived => Some("Number of correct commands received"),
            Self::GetSafeModeCount => Some("Number of safe modes"),
            Self::GetUptime => Some("Seconds since FSW start"),
            _ => None,
        }
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
