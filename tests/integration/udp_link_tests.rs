//! End-to-end over loopback UDP: a ground socket talks to the control loop.

use std::net::UdpSocket;
use std::time::Duration;

use super::mock_io::{ManualClock, RecordingSink};

use fsw::adapters::udp::UdpCommandTransport;
use fsw::app::commands::Command;
use fsw::comms::codec::{Reply, ReplyBody};
use fsw::config::FswConfig;
use fsw::control_loop::{ControlLoop, StepOutcome};
use fsw::fsm::OperatingMode;

struct Link {
    control: ControlLoop<UdpCommandTransport, ManualClock, RecordingSink>,
    ground: UdpSocket,
}

impl Link {
    fn open() -> Self {
        let config = FswConfig {
            bind_addr: "127.0.0.1".into(),
            listen_port: 0,
            recv_timeout_ms: 100,
            ..FswConfig::default()
        };
        let transport = UdpCommandTransport::bind(&config).unwrap();
        let fsw_addr = transport.local_addr().unwrap();

        let ground = UdpSocket::bind("127.0.0.1:0").unwrap();
        ground.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        ground.connect(fsw_addr).unwrap();

        let control = ControlLoop::new(config, transport, ManualClock::new(), RecordingSink::new());
        Self { control, ground }
    }

    /// Send `bytes`, run one loop iteration, return the raw reply.
    fn exchange(&mut self, bytes: &[u8]) -> Vec<u8> {
        self.ground.send(bytes).unwrap();
        self.step_and_collect()
    }

    /// Run one loop iteration that must answer a queued command.
    fn step_and_collect(&mut self) -> Vec<u8> {
        let outcome = self.control.step().unwrap();
        assert!(matches!(outcome, StepOutcome::Replied { .. }), "got {outcome:?}");

        let mut buf = [0u8; 64];
        let n = self.ground.recv(&mut buf).unwrap();
        buf[..n].to_vec()
    }

    fn command(&mut self, cmd: Command) -> fsw::comms::codec::ParsedReply {
        let raw = self.exchange(&[cmd.wire_byte()]);
        Reply::parse(Some(cmd), &raw).unwrap()
    }
}

#[test]
fn idle_iteration_times_out() {
    let mut link = Link::open();
    link.control.clock().advance_secs(10);
    assert_eq!(link.control.step().unwrap(), StepOutcome::Idle);
    assert_eq!(link.control.service().mode(), OperatingMode::Ready);
}

#[test]
fn warmup_then_query_session() {
    let mut link = Link::open();

    // Sent during warm-up: held in the socket, answered once READY.
    link.ground.send(&[Command::GetUptime.wire_byte()]).unwrap();
    assert_eq!(link.control.step().unwrap(), StepOutcome::Idle);

    link.control.clock().advance_secs(12);

    let raw = link.step_and_collect();
    let uptime = Reply::parse(Some(Command::GetUptime), &raw).unwrap();
    assert_eq!(uptime.body, ReplyBody::UptimeSecs(12));
    assert_eq!(uptime.mode, OperatingMode::Ready);

    let count = link.command(Command::GetCommandsReceived);
    assert_eq!(count.body, ReplyBody::Count(1));
    assert_eq!(count.accepted(), Some(true));
}

#[test]
fn safe_mode_and_shutdown_session() {
    let mut link = Link::open();
    link.control.clock().advance_secs(10);

    let enable = link.exchange(&[Command::EnableSafeMode.wire_byte()]);
    assert_eq!(enable, vec![0x04]);

    let entries = link.command(Command::GetSafeModeCount);
    assert_eq!(entries.body, ReplyBody::Count(1));

    let unknown = link.exchange(&[0xFF]);
    let parsed = Reply::parse(None, &unknown).unwrap();
    assert_eq!(parsed.accepted(), Some(false));
    assert_eq!(parsed.mode, OperatingMode::SafeMode);

    let bye = link.command(Command::Shutdown);
    assert_eq!(bye.body, ReplyBody::ShuttingDown);
    assert_eq!(bye.mode, OperatingMode::SafeMode);

    assert_eq!(link.control.step().unwrap(), StepOutcome::Shutdown);
}
