//! Flight Software — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UdpCommandTransport  LogEventSink  JsonFileConfig  Monotonic  │
//! │  (CommandTransport)   (EventSink)   (ConfigPort)    (Clock)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            FlightService (pure logic)                  │    │
//! │  │  Codec · FSM · Counters                                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ControlLoop (tick · receive · reply)                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `fsw [config.json]`.  Log level comes from `RUST_LOG`.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use fsw::adapters::config_file::JsonFileConfig;
use fsw::adapters::log_sink::LogEventSink;
use fsw::adapters::time::MonotonicClock;
use fsw::adapters::udp::UdpCommandTransport;
use fsw::app::ports::ConfigPort;
use fsw::config::FswConfig;
use fsw::control_loop::ControlLoop;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Flight Software v{} initializing", env!("CARGO_PKG_VERSION"));

    // ── 2. Config (file or defaults) ──────────────────────────
    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let port = JsonFileConfig::new(path);
            port.load_or_init()
                .with_context(|| format!("loading config from {}", port.path().display()))?
        }
        None => {
            info!("No config file given, using defaults");
            FswConfig::default()
        }
    };

    // ── 3. Command interface ──────────────────────────────────
    let transport = UdpCommandTransport::bind(&config).context("failed to create command interface")?;
    info!("Established command interface on {}", transport.local_addr()?);

    // ── 4. Control loop (mission clock starts here) ───────────
    let mut control = ControlLoop::new(config, transport, MonotonicClock::new(), LogEventSink::new());
    info!("Flight Software initialized");

    control.run().context("control loop aborted")?;

    let counters = control.service().counters();
    info!(
        "Flight Software shut down in {} (accepted={}, safe_modes={})",
        control.service().mode(),
        counters.commands_accepted,
        counters.safe_mode_entries
    );
    Ok(())
}
