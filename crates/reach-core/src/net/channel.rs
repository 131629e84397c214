use crate::error::{Error, Result};
use crate::net::socket::Socket;
use crate::net::{ipv4::Ipv4, ipv6::Ipv6, Network};
use crate::probe::{EchoReply, EchoRequest};
use std::net::IpAddr;
use std::time::Duration;
use tracing::instrument;

/// The maximum size of the IP packet we allow.
pub const MAX_PACKET_SIZE: usize = 1024;

/// A channel for sending and receiving `ICMP` echo packets.
pub struct Channel<S: Socket> {
    socket: S,
    family_config: FamilyConfig,
}

/// The IP family configuration for the channel.
enum FamilyConfig {
    V4(Ipv4),
    V6(Ipv6),
}

impl<S: Socket> Channel<S> {
    /// Create a `Channel`.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux.
    #[instrument(skip_all, level = "trace")]
    pub fn connect(target_addr: IpAddr) -> Result<Self> {
        tracing::debug!(?target_addr);
        let (socket, family_config) = match target_addr {
            IpAddr::V4(dest_addr) => {
                let socket = S::new_icmp_socket_ipv4().map_err(Error::ChannelInit)?;
                (socket, FamilyConfig::V4(Ipv4 { dest_addr }))
            }
            IpAddr::V6(dest_addr) => {
                let socket = S::new_icmp_socket_ipv6().map_err(Error::ChannelInit)?;
                (socket, FamilyConfig::V6(Ipv6 { dest_addr }))
            }
        };
        Ok(Self {
            socket,
            family_config,
        })
    }
}

impl<S: Socket> Network for Channel<S> {
    #[instrument(skip(self), level = "trace")]
    fn send_probe(&mut self, probe: EchoRequest) -> Result<()> {
        tracing::debug!(?probe);
        match &self.family_config {
            FamilyConfig::V4(ipv4) => ipv4.dispatch_echo_probe(&mut self.socket, probe),
            FamilyConfig::V6(ipv6) => ipv6.dispatch_echo_probe(&mut self.socket, probe),
        }
    }
    #[instrument(skip_all, level = "trace")]
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<EchoReply>> {
        let reply = if self.socket.is_readable(timeout)? {
            match &self.family_config {
                FamilyConfig::V4(ipv4) => ipv4.recv_echo_probe(&mut self.socket),
                FamilyConfig::V6(ipv6) => ipv6.recv_echo_probe(&mut self.socket),
            }
        } else {
            Ok(None)
        }?;
        if let Some(reply) = &reply {
            tracing::debug!(?reply);
        }
        Ok(reply)
    }
}
