use crate::constants::TIMESTAMP_SIZE;
use crate::error::{Error, ErrorKind, Result};
use crate::net::channel::MAX_PACKET_SIZE;
use crate::net::ipv4::{extract_timestamp, payload_size};
use crate::net::socket::Socket;
use crate::probe::{EchoReply, EchoRequest};
use crate::types::{PingId, Sequence};
use reach_packet::icmpv6::echo_reply::EchoReplyPacket;
use reach_packet::icmpv6::echo_request::EchoRequestPacket;
use reach_packet::icmpv6::{IcmpCode, IcmpPacket, IcmpType};
use std::io;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::time::SystemTime;
use tracing::instrument;

/// The IPv6 implementation.
#[derive(Debug)]
pub struct Ipv6 {
    pub dest_addr: Ipv6Addr,
}

impl Ipv6 {
    /// Dispatch an `ICMP` echo request.
    ///
    /// The checksum is left as zero as for `ICMPv6` it is calculated by the
    /// kernel over the pseudo-header.
    #[instrument(skip(self, socket), level = "trace")]
    pub fn dispatch_echo_probe<S: Socket>(&self, socket: &mut S, probe: EchoRequest) -> Result<()> {
        let mut icmp_buf = [0_u8; MAX_PACKET_SIZE];
        let payload_size = payload_size(probe.payload_size);
        let packet_size = IcmpPacket::minimum_packet_size() + payload_size;
        let mut payload = [0_u8; MAX_PACKET_SIZE];
        payload[..TIMESTAMP_SIZE].copy_from_slice(&probe.timestamp.to_be_bytes());
        let mut icmp = EchoRequestPacket::new(&mut icmp_buf[..packet_size])?;
        icmp.set_icmp_type(IcmpType::EchoRequest);
        icmp.set_icmp_code(IcmpCode(0));
        icmp.set_identifier(probe.ping_id.0);
        icmp.set_sequence(probe.sequence.0);
        icmp.set_payload(&payload[..payload_size]);
        let remote_addr = SocketAddr::new(IpAddr::V6(self.dest_addr), 0);
        socket.send_to(icmp.packet(), remote_addr)?;
        Ok(())
    }

    /// Receive the next `ICMP` echo reply, if any.
    ///
    /// Raw `ICMPv6` sockets deliver the `ICMP` message without an IP header.
    /// Datagrams too short to parse are discarded.
    #[instrument(skip(self, socket), level = "trace")]
    pub fn recv_echo_probe<S: Socket>(&self, socket: &mut S) -> Result<Option<EchoReply>> {
        let mut buf = [0_u8; MAX_PACKET_SIZE];
        match socket.read(&mut buf) {
            Ok(bytes_read) => Ok(self.extract_echo_reply(&buf[..bytes_read])),
            Err(err) => match err.kind() {
                ErrorKind::Std(io::ErrorKind::WouldBlock) => Ok(None),
                _ => Err(Error::IoError(err)),
            },
        }
    }

    fn extract_echo_reply(&self, packet: &[u8]) -> Option<EchoReply> {
        let recv = SystemTime::now();
        let icmp = IcmpPacket::new_view(packet).ok()?;
        if icmp.get_icmp_type() != IcmpType::EchoReply {
            return None;
        }
        let echo_reply = EchoReplyPacket::new_view(icmp.packet()).ok()?;
        let timestamp = extract_timestamp(echo_reply.payload());
        Some(EchoReply {
            ping_id: PingId(echo_reply.get_identifier()),
            sequence: Sequence(echo_reply.get_sequence()),
            timestamp,
            recv,
            addr: IpAddr::V6(self.dest_addr),
            bytes: packet.len(),
        })
    }
}
