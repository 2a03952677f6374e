//! Operating-mode state machine.
//!
//! One row of plain `fn` pointers per mode:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌────────────┬───────────┬──────────┬───────────────────┬───┐ │
//! │  │ Mode       │ on_enter  │ on_exit  │ on_update         │ T │ │
//! │  ├────────────┼───────────┼──────────┼───────────────────┼───┤ │
//! │  │ Restarting │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │ │
//! │  │ Ready      │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │ │
//! │  │ SafeMode   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │   │ │
//! │  │ BbqMode    │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ x │ │
//! │  └────────────┴───────────┴──────────┴───────────────────┴───┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** mode.
//! If it returns `Some(next)`, the engine runs `on_exit` for the
//! current mode, then `on_enter` for the next, and updates the
//! current pointer.  A mode flagged `terminal` never leaves, whether
//! the request comes from `on_update` or from a command.

pub mod context;
pub mod states;

use context::FsmContext;
use log::{info, warn};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// The craft's operating mode.  Exactly one is active at any time.
///
/// The discriminant is the value reported as the trailing byte of every
/// telemetry reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatingMode {
    Restarting = 0x01,
    Ready = 0x02,
    SafeMode = 0x04,
    /// Most-degraded mode.  Terminal.
    BbqMode = 0x08,
}

impl OperatingMode {
    /// Total number of modes — used to size the table array.
    pub const COUNT: usize = 4;

    /// Every mode, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Restarting,
        Self::Ready,
        Self::SafeMode,
        Self::BbqMode,
    ];

    /// Position of this mode in the state table.
    pub const fn index(self) -> usize {
        match self {
            Self::Restarting => 0,
            Self::Ready => 1,
            Self::SafeMode => 2,
            Self::BbqMode => 3,
        }
    }

    /// Convert a table index back to a mode.  Panics on out-of-range in
    /// debug builds; returns `BbqMode` in release (most conservative).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Restarting,
            1 => Self::Ready,
            2 => Self::SafeMode,
            3 => Self::BbqMode,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::BbqMode
            }
        }
    }

    /// Value carried on the wire.
    pub const fn wire_value(self) -> u8 {
        self as u8
    }

    /// Parse a wire value.  `None` for anything that is not exactly one
    /// mode bit.
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Restarting),
            0x02 => Some(Self::Ready),
            0x04 => Some(Self::SafeMode),
            0x08 => Some(Self::BbqMode),
            _ => None,
        }
    }

    /// Upper-case name as used in operator logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Restarting => "RESTARTING",
            Self::Ready => "READY",
            Self::SafeMode => "SAFE_MODE",
            Self::BbqMode => "BBQ_MODE",
        }
    }
}

impl core::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Mode entry/exit hook, run once per transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-tick mode action.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<OperatingMode>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// One row of the mode table.
pub struct StateDescriptor {
    pub id: OperatingMode,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
    /// No transition ever leaves a terminal mode.
    pub terminal: bool,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// Mode engine: owns the table and threads an [`FsmContext`] through every
/// handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `OperatingMode::index()`.
    table: [StateDescriptor; OperatingMode::COUNT],
    /// Index of the currently active mode.
    current: usize,
}

impl Fsm {
    /// Build the engine with `initial` as the current mode.  No hook runs yet.
    pub fn new(table: [StateDescriptor; OperatingMode::COUNT], initial: OperatingMode) -> Self {
        Self {
            table,
            current: initial.index(),
        }
    }

    /// Run `on_enter` of the initial mode.  Call once, before any `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].id);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current mode's `on_update` and follow the transition it
    /// requests, if any.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition on behalf of a command.
    ///
    /// Returns `true` if the mode actually changed.  Requests to enter the
    /// current mode, or to leave a terminal one, are refused.
    pub fn force_transition(&mut self, next: OperatingMode, ctx: &mut FsmContext) -> bool {
        if next.index() == self.current {
            return false;
        }
        self.transition(next, ctx)
    }

    /// The current mode.
    pub fn current_state(&self) -> OperatingMode {
        OperatingMode::from_index(self.current)
    }

    /// Whether the current mode is terminal.
    pub fn is_terminal(&self) -> bool {
        self.table[self.current].terminal
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: OperatingMode, ctx: &mut FsmContext) -> bool {
        let from = self.table[self.current].id;

        if self.table[self.current].terminal {
            warn!("FSM transition {from} -> {next_id} refused: {from} is terminal");
            return false;
        }

        info!("Transitioning to {next_id} (from {from})");

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_id.index();

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
        true
    }
}
