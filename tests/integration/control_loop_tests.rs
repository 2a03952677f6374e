//! Control loop against a scripted transport: receive, dispatch, reply.

use std::time::Duration;

use super::mock_io::{ManualClock, RecordingSink, ScriptedTransport};

use fsw::app::commands::Command;
use fsw::app::events::AppEvent;
use fsw::config::FswConfig;
use fsw::control_loop::{ControlLoop, StepOutcome};
use fsw::fsm::OperatingMode;

type Loop = ControlLoop<ScriptedTransport, ManualClock, RecordingSink>;

fn make_loop(config: FswConfig) -> Loop {
    ControlLoop::new(
        config,
        ScriptedTransport::new(),
        ManualClock::new(),
        RecordingSink::new(),
    )
}

fn ready_loop() -> Loop {
    let mut control = make_loop(FswConfig::default());
    control.clock().advance_secs(10);
    assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    assert_eq!(control.service().mode(), OperatingMode::Ready);
    control
}

#[test]
fn idle_step_waits_with_configured_timeout() {
    let mut control = ready_loop();
    control.transport_mut().push_timeout();

    assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    assert_eq!(
        control.transport().timeouts_seen,
        vec![Duration::from_millis(200); 2]
    );
    assert!(control.transport().sent.is_empty());
}

#[test]
fn custom_timeout_reaches_transport() {
    let config = FswConfig {
        recv_timeout_ms: 50,
        ..FswConfig::default()
    };
    let mut control = make_loop(config);
    control.step().unwrap();
    assert_eq!(control.transport().holds, vec![Duration::from_millis(50)]);

    control.clock().advance_secs(10);
    control.step().unwrap();
    assert_eq!(control.transport().timeouts_seen, vec![Duration::from_millis(50)]);
}

#[test]
fn reply_goes_back_to_sender() {
    let mut control = ready_loop();
    control.transport_mut().push(7, &[Command::GetSafeModeCount.wire_byte()]);
    control.transport_mut().push(9, &[Command::GetUptime.wire_byte()]);

    assert_eq!(
        control.step().unwrap(),
        StepOutcome::Replied {
            command: Command::GetSafeModeCount.wire_byte(),
            reply_len: 3,
        }
    );
    control.step().unwrap();

    let sent = &control.transport().sent;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], (7, vec![0, 0, 0x02]));
    assert_eq!(sent[1].0, 9);
    assert_eq!(sent[1].1.len(), 9);
}

#[test]
fn empty_datagram_is_ignored() {
    let mut control = ready_loop();
    control.transport_mut().push(1, &[]);

    assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    assert!(control.transport().sent.is_empty());
    let c = control.service().counters();
    assert_eq!((c.commands_accepted, c.commands_rejected), (0, 0));
}

#[test]
fn only_first_byte_of_datagram_counts() {
    let mut control = ready_loop();
    control
        .transport_mut()
        .push(1, &[Command::EnableSafeMode.wire_byte(), 0xAA, 0xBB]);

    control.step().unwrap();

    assert_eq!(control.service().mode(), OperatingMode::SafeMode);
    assert_eq!(control.service().counters().commands_accepted, 1);
    assert_eq!(control.service().counters().commands_rejected, 0);
    assert_eq!(control.transport().last_reply(), Some(&[0x04][..]));
}

#[test]
fn warmup_follows_clock() {
    let mut control = make_loop(FswConfig::default());
    control.clock().advance_secs(9);
    assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    assert_eq!(control.service().mode(), OperatingMode::Restarting);

    control.clock().advance_secs(1);
    control.step().unwrap();
    assert_eq!(control.service().mode(), OperatingMode::Ready);
}

#[test]
fn link_untouched_during_warmup() {
    let mut control = make_loop(FswConfig::default());
    control.transport_mut().push(1, &[Command::GetUptime.wire_byte()]);

    for _ in 0..3 {
        assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    }

    assert!(control.transport().timeouts_seen.is_empty());
    assert_eq!(control.transport().holds, vec![Duration::from_millis(200); 3]);
    assert_eq!(control.transport().inbound.len(), 1);
    assert!(control.transport().sent.is_empty());
}

#[test]
fn commands_queued_during_warmup_run_in_ready() {
    let mut control = make_loop(FswConfig::default());
    for _ in 0..5 {
        control.transport_mut().push(1, &[Command::GetUptime.wire_byte()]);
    }
    for _ in 0..5 {
        control.step().unwrap();
    }
    assert_eq!(control.service().counters().commands_rejected, 0);

    control.clock().advance_secs(10);
    for _ in 0..6 {
        control.step().unwrap();
    }

    assert_eq!(control.service().mode(), OperatingMode::Ready);
    let c = control.service().counters();
    assert_eq!((c.commands_accepted, c.commands_rejected), (5, 0));
    assert_eq!(c.safe_mode_entries, 0);

    let sent = &control.transport().sent;
    assert_eq!(sent.len(), 5);
    for (_, reply) in sent {
        assert_eq!(reply.len(), 9);
        assert_eq!(reply.last(), Some(&OperatingMode::Ready.wire_value()));
    }
}

#[test]
fn escalation_applies_on_next_iteration() {
    let mut control = ready_loop();
    for _ in 0..5 {
        control.transport_mut().push(1, &[0xAA]);
    }
    for _ in 0..5 {
        control.step().unwrap();
    }
    assert_eq!(control.service().mode(), OperatingMode::Ready);

    control.step().unwrap();
    assert_eq!(control.service().mode(), OperatingMode::SafeMode);
    assert_eq!(control.service().counters().safe_mode_entries, 1);
}

#[test]
fn run_stops_after_shutdown() {
    let mut control = ready_loop();
    control.transport_mut().push_timeout();
    control.transport_mut().push(3, &[Command::EnableSafeMode.wire_byte()]);
    control.transport_mut().push(3, &[Command::Shutdown.wire_byte()]);
    control.transport_mut().push(3, &[Command::GetUptime.wire_byte()]);

    control.run().unwrap();

    assert!(control.service().shutdown_requested());
    assert_eq!(control.transport().last_reply(), Some(&[0xFF, 0x04][..]));
    assert_eq!(control.transport().inbound.len(), 1, "loop must stop before reading more");
    assert_eq!(control.step().unwrap(), StepOutcome::Shutdown);
}

#[test]
fn failed_send_is_not_fatal() {
    let mut control = ready_loop();
    control.transport_mut().fail_sends = true;
    control.transport_mut().push(1, &[Command::GetSafeModeCount.wire_byte()]);

    let outcome = control.step().unwrap();

    assert!(matches!(outcome, StepOutcome::Replied { .. }));
    assert_eq!(control.service().counters().commands_accepted, 1);
    assert!(control.transport().sent.is_empty());
}

#[test]
fn telemetry_emitted_on_interval() {
    let config = FswConfig {
        telemetry_interval_secs: 5,
        ..FswConfig::default()
    };
    let mut control = make_loop(config);
    let telemetry = |c: &Loop| c.sink().count(|e| matches!(e, AppEvent::Telemetry(_)));

    control.step().unwrap();
    assert_eq!(telemetry(&control), 0);

    control.clock().advance_secs(5);
    control.step().unwrap();
    control.step().unwrap();
    assert_eq!(telemetry(&control), 1);

    control.clock().advance_secs(5);
    control.step().unwrap();
    assert_eq!(telemetry(&control), 2);

    let Some(AppEvent::Telemetry(last)) = control
        .sink()
        .events
        .iter()
        .rev()
        .find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        panic!("no telemetry event");
    };
    assert_eq!(last.uptime_secs, 10);
    assert_eq!(last.mode, OperatingMode::Ready);
}

#[test]
fn telemetry_disabled_with_zero_interval() {
    let config = FswConfig {
        telemetry_interval_secs: 0,
        ..FswConfig::default()
    };
    let mut control = make_loop(config);
    control.clock().advance_secs(3600);
    control.step().unwrap();
    assert_eq!(
        control.sink().count(|e| matches!(e, AppEvent::Telemetry(_))),
        0
    );
}

#[test]
fn null_transport_runs_tick_only() {
    use fsw::comms::transport::NullTransport;

    let mut control = ControlLoop::new(
        FswConfig::default(),
        NullTransport,
        ManualClock::new(),
        RecordingSink::new(),
    );
    for _ in 0..3 {
        assert_eq!(control.step().unwrap(), StepOutcome::Idle);
    }
    control.clock().advance_secs(10);
    control.step().unwrap();
    assert_eq!(control.service().mode(), OperatingMode::Ready);
}
