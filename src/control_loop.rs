//! Single-threaded control loop.
//!
//! One iteration:
//!
//! ```text
//!   shutdown? ──yes──▶ stop
//!       │no
//!   service.tick()          (warm-up hand-over, escalation)
//!   telemetry due? ─▶ emit
//!   RESTARTING? ──yes──▶ transport.hold(recv_timeout), stop here
//!       │no
//!   transport.receive(≤ recv_timeout)
//!       │datagram
//!   service.handle_command(first byte) ──▶ transport.send(reply, sender)
//! ```
//!
//! Nothing is read off the link during warm-up: commands sent while the
//! craft is RESTARTING wait in the transport and are handled once it is
//! READY.
//!
//! The loop is the sole owner of the [`FlightService`]; every `tick` and
//! `handle_command` goes through `&mut self`, so counters and mode are
//! never touched concurrently.

use core::time::Duration;

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink};
use crate::app::service::FlightService;
use crate::comms::transport::CommandTransport;
use crate::config::FswConfig;
use crate::fsm::OperatingMode;

/// Receive buffer size.  Only the first byte of a datagram is a command;
/// the rest is read so it can be reported and discarded.
const RX_BUF_LEN: usize = 64;

/// What one [`ControlLoop::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No datagram was handled: still warming up, nothing arrived within
    /// the receive wait, or it was empty.
    Idle,
    /// A command was processed and a reply of `reply_len` bytes was handed
    /// to the transport.
    Replied { command: u8, reply_len: usize },
    /// Shutdown was requested; the loop must stop.
    Shutdown,
}

/// Drives a [`FlightService`] from a transport, a clock and an event sink.
pub struct ControlLoop<T: CommandTransport, C: ClockPort, S: EventSink> {
    service: FlightService,
    transport: T,
    clock: C,
    sink: S,
    recv_timeout: Duration,
    telemetry_interval: Option<Duration>,
    last_telemetry: Duration,
    rx_buf: [u8; RX_BUF_LEN],
}

impl<T: CommandTransport, C: ClockPort, S: EventSink> ControlLoop<T, C, S> {
    /// Build the loop and start the flight service (mission clock starts now).
    pub fn new(config: FswConfig, transport: T, clock: C, mut sink: S) -> Self {
        let recv_timeout = Duration::from_millis(u64::from(config.recv_timeout_ms));
        let telemetry_interval = match config.telemetry_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(u64::from(secs))),
        };

        let mut service = FlightService::new(config, &clock);
        service.start(&mut sink);

        Self {
            service,
            transport,
            clock,
            sink,
            recv_timeout,
            telemetry_interval,
            last_telemetry: Duration::ZERO,
            rx_buf: [0; RX_BUF_LEN],
        }
    }

    /// Run until a Shutdown command is accepted or the transport fails.
    pub fn run(&mut self) -> Result<(), T::Error> {
        info!("Entering control loop");
        while self.step()? != StepOutcome::Shutdown {}
        info!("Control loop stopped in {}", self.service.mode());
        Ok(())
    }

    /// One loop iteration.
    pub fn step(&mut self) -> Result<StepOutcome, T::Error> {
        if self.service.shutdown_requested() {
            return Ok(StepOutcome::Shutdown);
        }

        self.service.tick(&self.clock, &mut self.sink);
        self.emit_telemetry_if_due();

        if self.service.mode() == OperatingMode::Restarting {
            self.transport.hold(self.recv_timeout);
            return Ok(StepOutcome::Idle);
        }

        let Some((len, peer)) = self.transport.receive(&mut self.rx_buf, self.recv_timeout)? else {
            return Ok(StepOutcome::Idle);
        };
        if len == 0 {
            debug!("Ignoring empty datagram from {peer:?}");
            return Ok(StepOutcome::Idle);
        }
        if len > 1 {
            debug!("Datagram from {peer:?} carried {len} bytes, using the first");
        }

        let command = self.rx_buf[0];
        let reply = self
            .service
            .handle_command(command, &self.clock, &mut self.sink);

        if let Err(e) = self.transport.send(reply.as_bytes(), peer) {
            warn!("Reply to {peer:?} not delivered: {e}");
        }

        Ok(StepOutcome::Replied {
            command,
            reply_len: reply.as_bytes().len(),
        })
    }

    pub fn service(&self) -> &FlightService {
        &self.service
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_telemetry_if_due(&mut self) {
        let Some(interval) = self.telemetry_interval else {
            return;
        };
        let now = self.service.mission_elapsed(&self.clock);
        if now.saturating_sub(self.last_telemetry) >= interval {
            self.last_telemetry = now;
            let data = self.service.build_telemetry(&self.clock);
            self.sink.emit(&AppEvent::Telemetry(data));
        }
    }
}
