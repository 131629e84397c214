use crate::constants::TIMESTAMP_SIZE;
use crate::error::{Error, ErrorKind, Result};
use crate::net::channel::MAX_PACKET_SIZE;
use crate::net::socket::Socket;
use crate::probe::{EchoReply, EchoRequest};
use crate::types::{PingId, Sequence};
use reach_packet::checksum::icmp_ipv4_checksum;
use reach_packet::icmpv4::echo_reply::EchoReplyPacket;
use reach_packet::icmpv4::echo_request::EchoRequestPacket;
use reach_packet::icmpv4::{IcmpCode, IcmpPacket, IcmpType};
use reach_packet::ipv4::Ipv4Packet;
use reach_packet::IpProtocol;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::SystemTime;
use tracing::instrument;

/// The IPv4 implementation.
#[derive(Debug)]
pub struct Ipv4 {
    pub dest_addr: Ipv4Addr,
}

impl Ipv4 {
    /// Dispatch an `ICMP` echo request.
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
        icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
        let remote_addr = SocketAddr::new(IpAddr::V4(self.dest_addr), 0);
        socket.send_to(icmp.packet(), remote_addr)?;
        Ok(())
    }

    /// Receive the next `ICMP` echo reply, if any.
    ///
    /// Raw `ICMP` sockets deliver the IPv4 header along with the payload and
    /// so the datagram must be unwrapped first.  Datagrams too short to parse
    /// are discarded.
    #[instrument(skip(self, socket), level = "trace")]
    pub fn recv_echo_probe<S: Socket>(&self, socket: &mut S) -> Result<Option<EchoReply>> {
        let mut buf = [0_u8; MAX_PACKET_SIZE];
        match socket.read(&mut buf) {
            Ok(bytes_read) => Ok(extract_echo_reply(&buf[..bytes_read])),
            Err(err) => match err.kind() {
                ErrorKind::Std(io::ErrorKind::WouldBlock) => Ok(None),
                _ => Err(Error::IoError(err)),
            },
        }
    }
}

/// The effective payload size for an echo request.
///
/// The payload is never smaller than the embedded send timestamp.
pub fn payload_size(requested: u16) -> usize {
    usize::from(requested).max(TIMESTAMP_SIZE)
}

fn extract_echo_reply(packet: &[u8]) -> Option<EchoReply> {
    let recv = SystemTime::now();
    let ipv4 = Ipv4Packet::new_view(packet).ok()?;
    if ipv4.get_protocol() != IpProtocol::Icmp {
        return None;
    }
    let icmp = IcmpPacket::new_view(ipv4.payload()).ok()?;
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
        addr: IpAddr::V4(ipv4.get_source()),
        bytes: ipv4.payload().len(),
    })
}

/// Recover the send timestamp from an echoed payload.
pub fn extract_timestamp(payload: &[u8]) -> Option<u64> {
    payload
        .get(..TIMESTAMP_SIZE)
        .and_then(|ts| <[u8; TIMESTAMP_SIZE]>::try_from(ts).ok())
        .map(u64::from_be_bytes)
}
