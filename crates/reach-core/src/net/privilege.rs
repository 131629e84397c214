use crate::config::PrivilegeMode;
use crate::error::{Error, ErrorKind, IoResult, Result};
use crate::net::socket::Socket;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::instrument;

/// Determine the privilege mode to run with.
///
/// Attempts to create and bind a raw `ICMP` socket.  If the operation is
/// denied then the process lacks the privilege for raw sockets (the
/// `CAP_NET_RAW` capability on Linux) and the run must fall back to `TCP`
/// connect probes.  Any other failure is unexpected and aborts the run.
///
/// The check is performed against IPv4 as the capability is not address
/// family specific.
#[instrument(ret, level = "trace")]
pub fn detect<S: Socket>() -> Result<PrivilegeMode> {
    match probe_raw_socket::<S>() {
        Ok(()) => Ok(PrivilegeMode::Privileged),
        Err(err) if err.kind() == ErrorKind::Std(io::ErrorKind::PermissionDenied) => {
            Ok(PrivilegeMode::Unprivileged)
        }
        Err(err) => Err(Error::ChannelInit(err)),
    }
}

fn probe_raw_socket<S: Socket>() -> IoResult<()> {
    let mut socket = S::new_icmp_socket_ipv4()?;
    socket.bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0))?;
    Ok(())
}
