//! Flight service — the hexagonal core.
//!
//! [`FlightService`] owns the FSM and the shared context (counters, mission
//! clock, shutdown flag).  It exposes two entry points, [`tick`] and
//! [`handle_command`], and a handful of queries.  Time and event output
//! flow through port traits injected at call sites.
//!
//! ```text
//!  ClockPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │     FlightService      │
//!   cmd byte ──▶ │  Codec · FSM · Counters│ ──▶ Reply
//!                └────────────────────────┘
//! ```
//!
//! [`tick`]: FlightService::tick
//! [`handle_command`]: FlightService::handle_command

use core::time::Duration;

use log::{debug, info, warn};

use crate::comms::codec::{self, Decoded, Reply, ReplyBuilder};
use crate::config::FswConfig;
use crate::fsm::context::{Counters, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, OperatingMode};

use super::commands::Command;
use super::events::{AppEvent, RejectReason, TelemetryData};
use super::ports::{ClockPort, EventSink};

// ───────────────────────────────────────────────────────────────
// FlightService
// ───────────────────────────────────────────────────────────────

/// The flight service orchestrates all domain logic.
pub struct FlightService {
    fsm: Fsm,
    ctx: FsmContext,
    /// Clock reading captured at construction.  Never changes.
    mission_start: Duration,
}

impl FlightService {
    /// Construct the service and capture the mission start time.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: FswConfig, clock: &impl ClockPort) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), OperatingMode::Restarting),
            ctx: FsmContext::new(config),
            mission_start: clock.uptime(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in RESTARTING.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("FlightService started in {}", self.fsm.current_state());
    }

    // ── Per-iteration state action ────────────────────────────

    /// Run the current mode's periodic action (warm-up hand-over, escalation).
    pub fn tick(&mut self, clock: &impl ClockPort, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        self.ctx.elapsed = self.mission_elapsed(clock);

        self.fsm.tick(&mut self.ctx);

        self.emit_if_changed(prev, sink);
    }

    // ── Command handling ──────────────────────────────────────

    /// Validate and execute one command byte, returning the telemetry reply.
    ///
    /// Never fails: unknown bytes and commands used in the wrong mode are
    /// counted as rejections and answered with the mode byte alone.
    pub fn handle_command(
        &mut self,
        raw: u8,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Reply {
        let prev = self.fsm.current_state();
        self.ctx.elapsed = self.mission_elapsed(clock);
        debug!("Received a command: 0x{raw:02X} in {prev}");

        let mut reply = ReplyBuilder::new();
        let verdict = match codec::decode(raw) {
            Decoded::Unrecognized(_) => Err(RejectReason::Unrecognized),
            Decoded::Known(cmd) if !cmd.is_legal_in(prev) => Err(RejectReason::IllegalInMode(cmd)),
            Decoded::Known(cmd) => {
                self.execute(cmd, &mut reply, sink);
                Ok(cmd)
            }
        };

        let counters = &mut self.ctx.counters;
        match verdict {
            Ok(command) => {
                counters.commands_accepted = counters.commands_accepted.wrapping_add(1);
                sink.emit(&AppEvent::CommandAccepted {
                    command,
                    mode: self.fsm.current_state(),
                });
            }
            Err(reason) => {
                counters.commands_rejected = counters.commands_rejected.wrapping_add(1);
                warn!(
                    "Rejected command 0x{raw:02X} in {prev}: {reason} ({} consecutive)",
                    counters.commands_rejected
                );
                sink.emit(&AppEvent::CommandRejected {
                    raw,
                    reason,
                    mode: prev,
                });
            }
        }

        self.emit_if_changed(prev, sink);
        reply.finish(self.fsm.current_state())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.fsm.current_state()
    }

    /// Snapshot of the telemetry counters.
    pub fn counters(&self) -> Counters {
        self.ctx.counters
    }

    /// Whether a Shutdown command has been accepted.
    pub fn shutdown_requested(&self) -> bool {
        self.ctx.shutdown_requested
    }

    /// Live configuration.
    pub fn config(&self) -> &FswConfig {
        &self.ctx.config
    }

    /// Time since mission start.
    pub fn mission_elapsed(&self, clock: &impl ClockPort) -> Duration {
        clock.uptime().saturating_sub(self.mission_start)
    }

    /// Build a telemetry snapshot as of `clock`.
    pub fn build_telemetry(&self, clock: &impl ClockPort) -> TelemetryData {
        let counters = self.ctx.counters;
        TelemetryData {
            mode: self.fsm.current_state(),
            commands_accepted: counters.commands_accepted,
            commands_rejected: counters.commands_rejected,
            safe_mode_entries: counters.safe_mode_entries,
            uptime_secs: i64::try_from(self.mission_elapsed(clock).as_secs()).unwrap_or(i64::MAX),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Apply a validated command's effect, appending any result payload.
    fn execute(&mut self, cmd: Command, reply: &mut ReplyBuilder, sink: &mut impl EventSink) {
        match cmd {
            Command::EnableSafeMode => {
                self.fsm.force_transition(OperatingMode::SafeMode, &mut self.ctx);
                self.ctx.counters.commands_rejected = 0;
            }
            Command::DisableSafeMode => {
                self.fsm.force_transition(OperatingMode::Ready, &mut self.ctx);
                self.ctx.counters.commands_rejected = 0;
            }
            Command::GetCommandsReceived => {
                info!(
                    "Returning number of commands received: {}",
                    self.ctx.counters.commands_accepted
                );
                reply.push_u16(self.ctx.counters.commands_accepted);
            }
            Command::GetSafeModeCount => {
                info!(
                    "Returning number of safe modes: {}",
                    self.ctx.counters.safe_mode_entries
                );
                reply.push_u16(self.ctx.counters.safe_mode_entries);
            }
            Command::GetUptime => {
                let secs = self.ctx.elapsed_secs();
                info!("Returning number of seconds since starting: {secs}");
                reply.push_i64(secs);
            }
            Command::ResetCommandCount => {
                info!("Resetting command count");
                self.ctx.counters.commands_accepted = 0;
            }
            Command::Shutdown => {
                info!("Shutting down");
                self.ctx.shutdown_requested = true;
                reply.push_shutdown_marker();
                sink.emit(&AppEvent::ShutdownRequested);
            }
        }
    }

    fn emit_if_changed(&self, prev: OperatingMode, sink: &mut impl EventSink) {
        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged { from: prev, to: now });
        }
    }
}
