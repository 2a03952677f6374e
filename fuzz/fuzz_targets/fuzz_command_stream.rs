//! Fuzz target: `FlightService` command stream
//!
//! Each input byte is either a command (even positions) or a clock advance
//! in seconds followed by a tick (odd positions).  Checks:
//! - No panics for any byte sequence
//! - Every reply ends with the mode byte the service reports afterwards
//! - BBQ_MODE is never left once entered
//! - accepted + rejected tracks the number of commands, as long as neither
//!   counter was reset or wrapped

#![no_main]

use std::cell::Cell;
use std::time::Duration;

use fsw::app::commands::Command;
use fsw::app::events::AppEvent;
use fsw::app::ports::{ClockPort, EventSink};
use fsw::app::service::FlightService;
use fsw::config::FswConfig;
use fsw::fsm::OperatingMode;
use libfuzzer_sys::fuzz_target;

struct FuzzClock(Cell<Duration>);

impl ClockPort for FuzzClock {
    fn uptime(&self) -> Duration {
        self.0.get()
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let clock = FuzzClock(Cell::new(Duration::ZERO));
    let mut sink = NullSink;
    let mut svc = FlightService::new(FswConfig::default(), &clock);
    svc.start(&mut sink);

    let mut issued: usize = 0;
    let mut counts_exact = true;
    let mut seen_bbq = false;

    for (i, &byte) in data.iter().enumerate() {
        if i % 2 == 1 {
            clock.0.set(clock.0.get() + Duration::from_secs(u64::from(byte)));
            svc.tick(&clock, &mut sink);
        } else {
            let reply = svc.handle_command(byte, &clock, &mut sink);
            issued += 1;
            assert_eq!(reply.as_bytes().last(), Some(&svc.mode().wire_value()));

            let resets = [
                Command::ResetCommandCount.wire_byte(),
                Command::EnableSafeMode.wire_byte(),
                Command::DisableSafeMode.wire_byte(),
            ];
            if resets.contains(&byte) {
                counts_exact = false;
            }
        }

        if seen_bbq {
            assert_eq!(svc.mode(), OperatingMode::BbqMode);
        }
        seen_bbq |= svc.mode() == OperatingMode::BbqMode;

        let c = svc.counters();
        if counts_exact && issued <= usize::from(u8::MAX) {
            assert_eq!(
                usize::from(c.commands_accepted) + usize::from(c.commands_rejected),
                issued
            );
        }
    }
});
