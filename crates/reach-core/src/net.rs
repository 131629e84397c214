use crate::error::Result;
use crate::probe::{EchoReply, EchoRequest};
use std::time::Duration;

/// IPv4 implementation.
pub(crate) mod ipv4;

/// IPv6 implementation.
mod ipv6;

/// Platform specific network code.
mod platform;

/// A network socket.
pub mod socket;

/// A channel for sending and receiving probes.
pub mod channel;

/// Privilege detection.
pub mod privilege;

/// The platform specific socket type.
pub use platform::SocketImpl;

/// An abstraction over a network interface for probing.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send an `EchoRequest`.
    fn send_probe(&mut self, probe: EchoRequest) -> Result<()>;

    /// Receive the next `ICMP` packet and return an `EchoReply`.
    ///
    /// Returns `None` if the read times out or the packet read is not an echo
    /// reply.
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<EchoReply>>;
}
