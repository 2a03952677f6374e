//! UDP command transport adapter.
//!
//! Implements [`CommandTransport`] over a `std::net::UdpSocket` bound to
//! `bind_addr:listen_port`.  The receive wait is applied as the socket's
//! read timeout and only re-applied when the caller asks for a different
//! one.
//!
//! ## Connection model
//!
//! There is no session.  Each datagram is answered to the address it came
//! from, so the most recent sender always gets the reply.

use core::time::Duration;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use log::{debug, info, warn};

use crate::comms::transport::CommandTransport;
use crate::config::FswConfig;
use crate::error::{CommsError, Error, Result};

/// UDP transport for the command interface.
pub struct UdpCommandTransport {
    socket: UdpSocket,
    /// Read timeout currently applied to `socket`.
    timeout: Duration,
}

impl UdpCommandTransport {
    /// Open the command socket described by `config`.
    pub fn bind(config: &FswConfig) -> Result<Self> {
        let ip = config
            .bind_addr
            .parse()
            .map_err(|_| Error::Config("bind_addr is not an IP address"))?;
        let addr = SocketAddr::new(ip, config.listen_port);

        let socket = UdpSocket::bind(addr).map_err(|e| {
            warn!("UDP bind to {addr} failed: {e}");
            CommsError::BindFailed
        })?;

        let timeout = Duration::from_millis(u64::from(config.recv_timeout_ms));
        socket.set_read_timeout(Some(timeout)).map_err(|e| {
            warn!("UDP set_read_timeout failed: {e}");
            CommsError::SocketOption
        })?;

        info!("Command interface listening on {addr}");
        Ok(Self { socket, timeout })
    }

    /// Address the socket is actually bound to (resolves port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|_| Error::Comms(CommsError::BindFailed))
    }
}

impl CommandTransport for UdpCommandTransport {
    type Peer = SocketAddr;
    type Error = Error;

    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<Option<(usize, SocketAddr)>> {
        if timeout != self.timeout {
            // A zero read timeout is rejected by std; treat it as the shortest wait.
            let wait = timeout.max(Duration::from_millis(1));
            self.socket.set_read_timeout(Some(wait)).map_err(|e| {
                warn!("UDP set_read_timeout failed: {e}");
                CommsError::SocketOption
            })?;
            self.timeout = timeout;
        }

        match self.socket.recv_from(buf) {
            Ok((len, peer)) => Ok(Some((len, peer))),
            Err(e) if is_transient(e.kind()) => {
                if e.kind() != ErrorKind::WouldBlock && e.kind() != ErrorKind::TimedOut {
                    debug!("UDP recv_from skipped: {e}");
                }
                Ok(None)
            }
            Err(e) => {
                warn!("UDP recv_from failed: {e}");
                Err(CommsError::ReceiveFailed.into())
            }
        }
    }

    fn send(&mut self, data: &[u8], peer: SocketAddr) -> Result<()> {
        self.socket.send_to(data, peer).map(|_| ()).map_err(|e| {
            warn!("UDP send_to {peer} failed: {e}");
            CommsError::SendFailed.into()
        })
    }

    fn hold(&mut self, timeout: Duration) {
        std::thread::sleep(timeout);
    }
}

/// Receive failures that only cost the current iteration.
///
/// Timeouts, signal interruptions, and (on Windows) the ICMP
/// port-unreachable left behind by an earlier reply.
fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::WouldBlock
            | ErrorKind::TimedOut
            | ErrorKind::Interrupted
            | ErrorKind::ConnectionReset
    )
}
