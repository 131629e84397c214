use crate::error::IoResult as Result;
use std::net::SocketAddr;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create an IPv4 socket for sending and receiving ICMP probes.
    fn new_icmp_socket_ipv4() -> Result<Self>;
    /// Create an IPv6 socket for sending and receiving ICMP probes.
    fn new_icmp_socket_ipv6() -> Result<Self>;
    /// Create an IPv4/TCP socket for connect probes.
    fn new_stream_socket_ipv4() -> Result<Self>;
    /// Create an IPv6/TCP socket for connect probes.
    fn new_stream_socket_ipv6() -> Result<Self>;
    fn bind(&mut self, address: SocketAddr) -> Result<()>;
    fn connect(&mut self, address: SocketAddr) -> Result<()>;
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<()>;
    /// Returns true if the socket becomes readable before the timeout, false otherwise.
    fn is_readable(&mut self, timeout: Duration) -> Result<bool>;
    /// Returns true if the socket becomes writable before the timeout, false otherwise.
    fn is_writable(&mut self, timeout: Duration) -> Result<bool>;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn shutdown(&mut self) -> Result<()>;
    fn take_error(&mut self) -> Result<Option<SocketError>>;
}

/// A socket error returned by `Socket::take_error`.
#[derive(Debug)]
pub enum SocketError {
    ConnectionRefused,
    Other(#[expect(dead_code)] std::io::Error),
}

#[cfg(test)]
pub mod tests {
    #[macro_export]
    macro_rules! mocket_read {
        ($packet: expr) => {
            move |buf: &mut [u8]| -> IoResult<usize> {
                buf[..$packet.len()].copy_from_slice(&$packet);
                Ok($packet.len())
            }
        };
    }
}
