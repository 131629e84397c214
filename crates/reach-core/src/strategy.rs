use crate::config::PingConfig;
use crate::constants::TCP_PROBE_PORT;
use crate::error::{Error, ErrorKind, IoError, IoOperation, Result};
use crate::net::ipv4::payload_size;
use crate::net::socket::{Socket, SocketError};
use crate::net::Network;
use crate::probe::{EchoRequest, ProbeOutcome, ProbeProtocol};
use crate::types::{PingId, Sequence};
use std::io;
use std::marker::PhantomData;
use std::net::{IpAddr, SocketAddr};
use std::thread::sleep;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::instrument;

/// A strategy which probes the target with `ICMP` echo requests.
///
/// One probe is dispatched per interval and the strategy waits for the
/// matching reply, or the timeout, before moving on.  Replies carrying an
/// unexpected identifier or sequence number belong to other processes or to
/// earlier probes and are discarded.
pub struct EchoStrategy<N: Network> {
    network: N,
    target_addr: IpAddr,
    ping_id: PingId,
    config: PingConfig,
}

impl<N: Network> EchoStrategy<N> {
    pub const fn new(network: N, target_addr: IpAddr, ping_id: PingId, config: PingConfig) -> Self {
        Self {
            network,
            target_addr,
            ping_id,
            config,
        }
    }

    /// Run the strategy, publishing each probe outcome to the observer.
    #[instrument(skip_all, level = "trace")]
    pub fn run<F: FnMut(&ProbeOutcome)>(&mut self, mut observer: F) -> Result<()> {
        for i in 0..self.config.count {
            let sequence = Sequence(i as u16 + 1);
            let outcome = self.probe(sequence);
            observer(&outcome);
            if outcome.sent && i + 1 != self.config.count {
                sleep(self.config.interval);
            }
        }
        Ok(())
    }

    fn probe(&mut self, sequence: Sequence) -> ProbeOutcome {
        let sent_at = SystemTime::now();
        let timestamp = sent_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let mut probe = EchoRequest::new(self.ping_id, sequence, self.config.payload_size);
        probe.timestamp = timestamp;
        match self.network.send_probe(probe) {
            Ok(()) => self.await_reply(sequence, sent_at),
            Err(err) => {
                tracing::debug!(?sequence, ?err, "failed to send probe");
                ProbeOutcome {
                    sequence,
                    sent: false,
                    rtt: None,
                    bytes: payload_size(self.config.payload_size),
                    addr: self.target_addr,
                    protocol: ProbeProtocol::Icmp,
                }
            }
        }
    }

    /// Wait for the reply matching the given sequence number.
    ///
    /// Unrelated packets read before the deadline do not consume the
    /// remaining wait.  A read failure abandons the wait and the probe is
    /// recorded as lost.
    fn await_reply(&mut self, sequence: Sequence, sent_at: SystemTime) -> ProbeOutcome {
        let lost = ProbeOutcome {
            sequence,
            sent: true,
            rtt: None,
            bytes: payload_size(self.config.payload_size),
            addr: self.target_addr,
            protocol: ProbeProtocol::Icmp,
        };
        let deadline = Instant::now() + self.config.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return lost;
            }
            match self.network.recv_probe(remaining) {
                Ok(Some(reply)) if reply.is_match(self.ping_id, sequence) => {
                    return ProbeOutcome {
                        sequence,
                        sent: true,
                        rtt: Some(reply.rtt(sent_at)),
                        bytes: reply.bytes,
                        addr: reply.addr,
                        protocol: ProbeProtocol::Icmp,
                    };
                }
                Ok(Some(reply)) => {
                    tracing::debug!(?reply, "discarding unrelated reply");
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(?sequence, ?err, "failed to receive reply");
                    return lost;
                }
            }
        }
    }
}

/// A strategy which probes the target by timing `TCP` connection
/// establishment.
///
/// Used when the process lacks the privilege for raw `ICMP` sockets.  Unlike
/// echo probes a connection failure aborts the run, there is no way to tell a
/// transient failure from a systematically unreachable port.
pub struct ConnectStrategy<S: Socket> {
    target_addr: IpAddr,
    config: PingConfig,
    socket: PhantomData<S>,
}

impl<S: Socket> ConnectStrategy<S> {
    pub const fn new(target_addr: IpAddr, config: PingConfig) -> Self {
        Self {
            target_addr,
            config,
            socket: PhantomData,
        }
    }

    /// Run the strategy, publishing each probe outcome to the observer.
    #[instrument(skip_all, level = "trace")]
    pub fn run<F: FnMut(&ProbeOutcome)>(&mut self, mut observer: F) -> Result<()> {
        for i in 0..self.config.count {
            let sequence = Sequence(i as u16 + 1);
            let rtt = self.connect()?;
            let outcome = ProbeOutcome {
                sequence,
                sent: true,
                rtt: Some(rtt),
                bytes: usize::from(self.config.payload_size),
                addr: self.target_addr,
                protocol: ProbeProtocol::Tcp,
            };
            observer(&outcome);
            sleep(self.config.interval);
        }
        Ok(())
    }

    /// Time the establishment of a single `TCP` connection.
    #[instrument(skip(self), level = "trace")]
    fn connect(&mut self) -> Result<Duration> {
        let remote_addr = SocketAddr::new(self.target_addr, TCP_PROBE_PORT);
        let start = Instant::now();
        let mut socket = make_stream_socket::<S>(self.target_addr).map_err(Error::ProbeFailed)?;
        match socket.connect(remote_addr) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::InProgress => {}
            Err(err) => return Err(Error::ProbeFailed(err)),
        }
        if !socket
            .is_writable(self.config.timeout)
            .map_err(Error::ProbeFailed)?
        {
            return Err(Error::ProbeFailed(IoError::Connect(
                io::Error::from(io::ErrorKind::TimedOut),
                remote_addr,
            )));
        }
        match socket.take_error().map_err(Error::ProbeFailed)? {
            None => {}
            Some(SocketError::ConnectionRefused) => {
                return Err(Error::ProbeFailed(IoError::Connect(
                    io::Error::from(io::ErrorKind::ConnectionRefused),
                    remote_addr,
                )));
            }
            Some(SocketError::Other(_)) => {
                return Err(Error::ProbeFailed(IoError::Other(
                    io::Error::from(io::ErrorKind::Other),
                    IoOperation::TakeError,
                )));
            }
        }
        let rtt = start.elapsed();
        if let Err(err) = socket.shutdown() {
            tracing::debug!(?err, "failed to shutdown socket");
        }
        Ok(rtt)
    }
}

fn make_stream_socket<S: Socket>(addr: IpAddr) -> crate::error::IoResult<S> {
    match addr {
        IpAddr::V4(_) => S::new_stream_socket_ipv4(),
        IpAddr::V6(_) => S::new_stream_socket_ipv6(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::socket::MockSocket;
    use crate::net::MockNetwork;
    use crate::probe::EchoReply;
    use mockall::predicate;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    static MTX: Mutex<()> = Mutex::new(());

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4));
    const PING_ID: PingId = PingId(1234);

    fn config(count: usize) -> PingConfig {
        PingConfig {
            count,
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(10),
            payload_size: 8,
        }
    }

    fn matching_reply(sequence: u16, rtt: Duration) -> EchoReply {
        let sent = Duration::from_secs(1_000_000);
        EchoReply {
            ping_id: PING_ID,
            sequence: Sequence(sequence),
            timestamp: Some(sent.as_nanos() as u64),
            recv: UNIX_EPOCH + sent + rtt,
            addr: ADDR,
            bytes: 16,
        }
    }

    #[test]
    fn test_echo_replies_received() -> anyhow::Result<()> {
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(3).returning(|_| Ok(()));
        let next_seq = std::sync::atomic::AtomicU16::new(1);
        network.expect_recv_probe().times(3).returning(move |_| {
            let seq = next_seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Some(matching_reply(seq, Duration::from_millis(25))))
        });
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(3));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(3, outcomes.len());
        assert!(outcomes.iter().all(|o| o.sent));
        Ok(())
    }

    #[test]
    fn test_echo_matching_reply_rtt() -> anyhow::Result<()> {
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(1).returning(|_| Ok(()));
        network
            .expect_recv_probe()
            .times(1)
            .returning(|_| Ok(Some(matching_reply(1, Duration::from_millis(25)))));
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(1));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(1, outcomes.len());
        assert_eq!(Sequence(1), outcomes[0].sequence);
        assert_eq!(Some(Duration::from_millis(25)), outcomes[0].rtt);
        assert_eq!(ADDR, outcomes[0].addr);
        assert_eq!(ProbeProtocol::Icmp, outcomes[0].protocol);
        Ok(())
    }

    #[test]
    fn test_echo_stray_reply_discarded() -> anyhow::Result<()> {
        let mut seq = mockall::Sequence::new();
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(1).returning(|_| Ok(()));
        network
            .expect_recv_probe()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                let mut stray = matching_reply(99, Duration::from_millis(1));
                stray.ping_id = PingId(4321);
                Ok(Some(stray))
            });
        network
            .expect_recv_probe()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(matching_reply(1, Duration::from_millis(5)))));
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(1));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(Some(Duration::from_millis(5)), outcomes[0].rtt);
        Ok(())
    }

    #[test]
    fn test_echo_send_failure_continues() -> anyhow::Result<()> {
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(2).returning(|probe| {
            if probe.sequence == Sequence(1) {
                Err(Error::IoError(IoError::SendTo(
                    io::Error::from(io::ErrorKind::AddrNotAvailable),
                    SocketAddr::new(ADDR, 0),
                )))
            } else {
                Ok(())
            }
        });
        network
            .expect_recv_probe()
            .times(1)
            .returning(|_| Ok(Some(matching_reply(2, Duration::from_millis(5)))));
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(2));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(2, outcomes.len());
        assert!(!outcomes[0].sent);
        assert_eq!(None, outcomes[0].rtt);
        assert!(outcomes[1].sent);
        Ok(())
    }

    #[test]
    fn test_echo_timeout() -> anyhow::Result<()> {
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(1).returning(|_| Ok(()));
        network.expect_recv_probe().returning(|_| Ok(None));
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(1));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(1, outcomes.len());
        assert!(outcomes[0].sent);
        assert_eq!(None, outcomes[0].rtt);
        Ok(())
    }

    #[test]
    fn test_echo_recv_error_marks_lost() -> anyhow::Result<()> {
        let mut network = MockNetwork::new();
        network.expect_send_probe().times(2).returning(|_| Ok(()));
        let next_seq = std::sync::atomic::AtomicU16::new(1);
        network.expect_recv_probe().times(2).returning(move |_| {
            let seq = next_seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if seq == 1 {
                Err(Error::IoError(IoError::Other(
                    io::Error::from(io::ErrorKind::InvalidData),
                    IoOperation::Read,
                )))
            } else {
                Ok(Some(matching_reply(seq, Duration::from_millis(5))))
            }
        });
        let mut outcomes = vec![];
        let mut strategy = EchoStrategy::new(network, ADDR, PING_ID, config(2));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(2, outcomes.len());
        assert!(outcomes[0].sent);
        assert_eq!(None, outcomes[0].rtt);
        assert_eq!(Some(Duration::from_millis(5)), outcomes[1].rtt);
        Ok(())
    }

    #[test]
    fn test_connect_success() -> anyhow::Result<()> {
        let _lock = MTX.lock();
        let expected_addr = SocketAddr::new(ADDR, TCP_PROBE_PORT);
        let ctx = MockSocket::new_stream_socket_ipv4_context();
        ctx.expect().times(2).returning(move || {
            let mut mocket = MockSocket::new();
            mocket
                .expect_connect()
                .with(predicate::eq(expected_addr))
                .times(1)
                .returning(|_| Ok(()));
            mocket
                .expect_is_writable()
                .times(1)
                .returning(|_| Ok(true));
            mocket.expect_take_error().times(1).returning(|| Ok(None));
            mocket.expect_shutdown().times(1).returning(|| Ok(()));
            Ok(mocket)
        });
        let mut outcomes = vec![];
        let mut strategy = ConnectStrategy::<MockSocket>::new(ADDR, config(2));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(2, outcomes.len());
        assert!(outcomes.iter().all(|o| o.sent && o.rtt.is_some()));
        assert!(outcomes
            .iter()
            .all(|o| o.protocol == ProbeProtocol::Tcp));
        Ok(())
    }

    #[test]
    fn test_connect_in_progress() -> anyhow::Result<()> {
        let _lock = MTX.lock();
        let ctx = MockSocket::new_stream_socket_ipv4_context();
        ctx.expect().times(1).returning(|| {
            let mut mocket = MockSocket::new();
            mocket.expect_connect().times(1).returning(|addr| {
                Err(IoError::Connect(io::Error::from(ErrorKind::InProgress), addr))
            });
            mocket
                .expect_is_writable()
                .times(1)
                .returning(|_| Ok(true));
            mocket.expect_take_error().times(1).returning(|| Ok(None));
            mocket.expect_shutdown().times(1).returning(|| Ok(()));
            Ok(mocket)
        });
        let mut outcomes = vec![];
        let mut strategy = ConnectStrategy::<MockSocket>::new(ADDR, config(1));
        strategy.run(|outcome| outcomes.push(*outcome))?;
        assert_eq!(1, outcomes.len());
        assert!(outcomes[0].rtt.is_some());
        Ok(())
    }

    #[test]
    fn test_connect_refused_aborts() {
        let _lock = MTX.lock();
        let ctx = MockSocket::new_stream_socket_ipv4_context();
        ctx.expect().times(1).returning(|| {
            let mut mocket = MockSocket::new();
            mocket.expect_connect().times(1).returning(|_| Ok(()));
            mocket
                .expect_is_writable()
                .times(1)
                .returning(|_| Ok(true));
            mocket
                .expect_take_error()
                .times(1)
                .returning(|| Ok(Some(SocketError::ConnectionRefused)));
            Ok(mocket)
        });
        let mut strategy = ConnectStrategy::<MockSocket>::new(ADDR, config(3));
        let err = strategy.run(|_| {}).unwrap_err();
        assert!(matches!(err, Error::ProbeFailed(_)));
    }

    #[test]
    fn test_connect_socket_failure_aborts() {
        let _lock = MTX.lock();
        let ctx = MockSocket::new_stream_socket_ipv4_context();
        ctx.expect().times(1).returning(|| {
            Err(IoError::Other(
                io::Error::from(io::ErrorKind::AddrNotAvailable),
                IoOperation::NewSocket,
            ))
        });
        let mut outcomes = vec![];
        let mut strategy = ConnectStrategy::<MockSocket>::new(ADDR, config(3));
        let err = strategy.run(|outcome| outcomes.push(*outcome)).unwrap_err();
        assert!(matches!(err, Error::ProbeFailed(_)));
        assert!(outcomes.is_empty());
    }
}
