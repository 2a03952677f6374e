//! Transport abstraction — any datagram channel that can carry one
//! command byte in and one reply out.
//!
//! Concrete implementations:
//! - UDP socket ([`UdpCommandTransport`](crate::adapters::udp::UdpCommandTransport))
//! - [`NullTransport`] for tick-only runs
//!
//! The control loop is generic over `CommandTransport`, so adding a new
//! transport requires zero changes to the flight logic.

use core::time::Duration;

/// Datagram-oriented command channel.
pub trait CommandTransport {
    /// Address of the sender of a datagram; replies are sent back to it.
    type Peer: Copy + core::fmt::Debug;

    /// Error type for this transport.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Wait at most `timeout` for the next datagram and copy it into `buf`.
    ///
    /// Returns `Ok(None)` if nothing arrived in time, otherwise the number
    /// of bytes copied (truncated to `buf.len()`) and the sender.
    fn receive(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<Option<(usize, Self::Peer)>, Self::Error>;

    /// Send `data` to `peer`.  Best effort: callers do not retry.
    fn send(&mut self, data: &[u8], peer: Self::Peer) -> Result<(), Self::Error>;

    /// Let `timeout` pass without taking anything off the link.  Datagrams
    /// that arrive meanwhile stay queued for a later `receive`.
    fn hold(&mut self, timeout: Duration);
}

/// A null transport that discards all writes and never receives.
pub struct NullTransport;

impl CommandTransport for NullTransport {
    type Peer = ();
    type Error = core::convert::Infallible;

    fn receive(
        &mut self,
        _buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<Option<(usize, ())>, Self::Error> {
        Ok(None)
    }

    fn send(&mut self, _data: &[u8], _peer: ()) -> Result<(), Self::Error> {
        Ok(())
    }

    fn hold(&mut self, _timeout: Duration) {}
}
