use crate::types::{PingId, Sequence};
use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The protocol a probe was sent with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProbeProtocol {
    /// `ICMP` echo request.
    Icmp,
    /// `TCP` connection establishment.
    Tcp,
}

/// An `ICMP` echo request probe to be dispatched.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EchoRequest {
    /// The run identifier carried in the request.
    pub ping_id: PingId,
    /// The sequence number of the request.
    pub sequence: Sequence,
    /// The size of the payload in bytes.
    pub payload_size: u16,
    /// The send timestamp, as nanoseconds since the unix epoch.
    ///
    /// Carried in the first 8 bytes of the payload so the round trip time can
    /// be recovered from the echoed reply without any local bookkeeping.
    pub timestamp: u64,
}

impl EchoRequest {
    #[must_use]
    pub const fn new(ping_id: PingId, sequence: Sequence, payload_size: u16) -> Self {
        Self {
            ping_id,
            sequence,
            payload_size,
            timestamp: 0,
        }
    }
}

/// An `ICMP` echo reply received from the network.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EchoReply {
    /// The run identifier echoed in the reply.
    pub ping_id: PingId,
    /// The sequence number echoed in the reply.
    pub sequence: Sequence,
    /// The send timestamp recovered from the echoed payload, if present.
    pub timestamp: Option<u64>,
    /// The time the reply was received.
    pub recv: SystemTime,
    /// The source address of the reply.
    pub addr: IpAddr,
    /// The number of `ICMP` bytes received.
    pub bytes: usize,
}

impl EchoReply {
    /// Does this reply correspond to the given request?
    #[must_use]
    pub fn is_match(&self, ping_id: PingId, sequence: Sequence) -> bool {
        self.ping_id == ping_id && self.sequence == sequence
    }

    /// Calculate the round trip time of the probe.
    ///
    /// The echoed send timestamp is preferred, falling back to the elapsed
    /// time since `sent_at` when the reply payload was too short to carry one.
    #[must_use]
    pub fn rtt(&self, sent_at: SystemTime) -> Duration {
        match self.timestamp {
            Some(ts) => self
                .recv
                .duration_since(UNIX_EPOCH + Duration::from_nanos(ts))
                .unwrap_or_default(),
            None => self.recv.duration_since(sent_at).unwrap_or_default(),
        }
    }
}

/// The outcome of a single probe.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProbeOutcome {
    /// The sequence number of the probe.
    pub sequence: Sequence,
    /// Whether the probe was sent successfully.
    pub sent: bool,
    /// The round trip time, if a reply was received before the timeout.
    pub rtt: Option<Duration>,
    /// The number of payload bytes involved.
    pub bytes: usize,
    /// The address the probe was sent to.
    pub addr: IpAddr,
    /// The protocol the probe was sent with.
    pub protocol: ProbeProtocol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn reply(ping_id: u16, sequence: u16, timestamp: Option<u64>, recv: SystemTime) -> EchoReply {
        EchoReply {
            ping_id: PingId(ping_id),
            sequence: Sequence(sequence),
            timestamp,
            recv,
            addr: ADDR,
            bytes: 64,
        }
    }

    #[test]
    fn test_is_match() {
        let reply = reply(1234, 3, None, SystemTime::now());
        assert!(reply.is_match(PingId(1234), Sequence(3)));
        assert!(!reply.is_match(PingId(1234), Sequence(4)));
        assert!(!reply.is_match(PingId(9999), Sequence(3)));
    }

    #[test]
    fn test_rtt_from_timestamp() {
        let sent_at = UNIX_EPOCH + Duration::from_secs(1000);
        let recv = sent_at + Duration::from_millis(25);
        let ts = Duration::from_secs(1000).as_nanos() as u64;
        let reply = reply(1, 1, Some(ts), recv);
        assert_eq!(Duration::from_millis(25), reply.rtt(sent_at));
    }

    #[test]
    fn test_rtt_without_timestamp() {
        let sent_at = UNIX_EPOCH + Duration::from_secs(1000);
        let recv = sent_at + Duration::from_millis(40);
        let reply = reply(1, 1, None, recv);
        assert_eq!(Duration::from_millis(40), reply.rtt(sent_at));
    }

    #[test]
    fn test_rtt_clock_skew() {
        let sent_at = UNIX_EPOCH + Duration::from_secs(1000);
        let recv = sent_at - Duration::from_millis(5);
        let reply = reply(1, 1, None, recv);
        assert_eq!(Duration::ZERO, reply.rtt(sent_at));
    }
}
