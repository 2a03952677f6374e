//! Fuzz target: `Reply::parse`
//!
//! The first input byte picks the request the reply answers; the rest is
//! the reply datagram.  Parsing must never panic, and any accepted reply
//! must carry a known mode byte in its last position.
//!
//! cargo fuzz run fuzz_reply_parse

#![no_main]

use fsw::app::commands::Command;
use fsw::comms::codec::{decode, Decoded, Reply};
use fsw::fsm::OperatingMode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&request, reply)) = data.split_first() else {
        return;
    };
    let sent: Option<Command> = match decode(request) {
        Decoded::Known(cmd) => Some(cmd),
        Decoded::Unrecognized(_) => None,
    };

    if let Ok(parsed) = Reply::parse(sent, reply) {
        let last = *reply.last().expect("parsed reply is non-empty");
        assert_eq!(OperatingMode::from_wire(last), Some(parsed.mode));
        assert!(reply.len() <= fsw::comms::codec::MAX_REPLY_LEN);
    }
});
