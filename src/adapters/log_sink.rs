//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (console via `env_logger` in the host binary).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] on one tagged line.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | mode={} | accepted={} rejected={} | safe_modes={} | uptime={}s",
                    t.mode, t.commands_accepted, t.commands_rejected, t.safe_mode_entries, t.uptime_secs,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::CommandAccepted { command, mode } => {
                info!("CMD   | accepted {} (mode={})", command, mode);
            }
            AppEvent::CommandRejected { raw, reason, mode } => {
                warn!("CMD   | rejected 0x{:02X}: {} (mode={})", raw, reason, mode);
            }
            AppEvent::ShutdownRequested => {
                info!("CMD   | shutdown requested");
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
        }
    }
}
