use crate::error::{ErrorKind, IoError, IoOperation, IoResult};
use crate::net::socket::{Socket, SocketError};
use itertools::Itertools;
use nix::{
    sys::select::FdSet,
    sys::time::{TimeVal, TimeValLike},
    Error,
};
use socket2::{Domain, Protocol, SockAddr, Type};
use std::io;
use std::io::Read;
use std::net::{Shutdown, SocketAddr};
use std::os::fd::AsFd;
use std::time::Duration;
use tracing::instrument;

/// A network socket.
pub struct SocketImpl {
    inner: socket2::Socket,
}

impl SocketImpl {
    fn new(domain: Domain, ty: Type, protocol: Protocol) -> IoResult<Self> {
        Ok(Self {
            inner: socket2::Socket::new(domain, ty, Some(protocol))
                .map_err(|err| IoError::Other(err, IoOperation::NewSocket))?,
        })
    }

    fn set_nonblocking(&self, nonblocking: bool) -> IoResult<()> {
        self.inner
            .set_nonblocking(nonblocking)
            .map_err(|err| IoError::Other(err, IoOperation::SetNonBlocking))
    }

    fn select(&self, read: bool, timeout: Duration) -> IoResult<bool> {
        let mut fds = FdSet::new();
        fds.insert(self.inner.as_fd());
        let (mut read_fds, mut write_fds) = if read {
            (Some(fds), None)
        } else {
            (None, Some(fds))
        };
        let ready = nix::sys::select::select(
            None,
            read_fds.as_mut(),
            write_fds.as_mut(),
            None,
            Some(&mut TimeVal::milliseconds(timeout.as_millis() as i64)),
        );
        match ready {
            Ok(ready) => Ok(ready == 1),
            Err(Error::EINTR) => Ok(false),
            Err(err) => Err(IoError::Other(io::Error::from(err), IoOperation::Select)),
        }
    }
}

impl Socket for SocketImpl {
    #[instrument(level = "trace")]
    fn new_icmp_socket_ipv4() -> IoResult<Self> {
        let socket = Self::new(Domain::IPV4, Type::RAW, Protocol::ICMPV4)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }
    #[instrument(level = "trace")]
    fn new_icmp_socket_ipv6() -> IoResult<Self> {
        let socket = Self::new(Domain::IPV6, Type::RAW, Protocol::ICMPV6)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }
    #[instrument(level = "trace")]
    fn new_stream_socket_ipv4() -> IoResult<Self> {
        let socket = Self::new(Domain::IPV4, Type::STREAM, Protocol::TCP)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }
    #[instrument(level = "trace")]
    fn new_stream_socket_ipv6() -> IoResult<Self> {
        let socket = Self::new(Domain::IPV6, Type::STREAM, Protocol::TCP)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }
    #[instrument(skip(self), level = "trace")]
    fn bind(&mut self, address: SocketAddr) -> IoResult<()> {
        self.inner
            .bind(&SockAddr::from(address))
            .map_err(|err| IoError::Bind(err, address))
    }
    #[instrument(skip(self), level = "trace")]
    fn connect(&mut self, address: SocketAddr) -> IoResult<()> {
        tracing::trace!(?address);
        self.inner
            .connect(&SockAddr::from(address))
            .map_err(|err| IoError::Connect(err, address))
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> IoResult<()> {
        tracing::trace!(buf = format!("{:02x?}", buf.iter().format(" ")), ?addr);
        self.inner
            .send_to(buf, &SockAddr::from(addr))
            .map_err(|err| IoError::SendTo(err, addr))?;
        Ok(())
    }
    #[instrument(skip(self), level = "trace")]
    fn is_readable(&mut self, timeout: Duration) -> IoResult<bool> {
        self.select(true, timeout)
    }
    #[instrument(skip(self), level = "trace")]
    fn is_writable(&mut self, timeout: Duration) -> IoResult<bool> {
        self.select(false, timeout)
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let bytes_read = self
            .inner
            .read(buf)
            .map_err(|err| IoError::Other(err, IoOperation::Read))?;
        tracing::trace!(
            buf = format!("{:02x?}", buf[..bytes_read].iter().format(" ")),
            bytes_read
        );
        Ok(bytes_read)
    }
    #[instrument(skip(self), level = "trace")]
    fn shutdown(&mut self) -> IoResult<()> {
        self.inner
            .shutdown(Shutdown::Both)
            .map_err(|err| IoError::Other(err, IoOperation::Shutdown))
    }
    #[instrument(skip(self), ret, level = "trace")]
    fn take_error(&mut self) -> IoResult<Option<SocketError>> {
        self.inner
            .take_error()
            .map(|err| {
                err.map(|e| match e.raw_os_error() {
                    Some(errno) if Error::from_raw(errno) == Error::ECONNREFUSED => {
                        SocketError::ConnectionRefused
                    }
                    _ => SocketError::Other(e),
                })
            })
            .map_err(|err| IoError::Other(err, IoOperation::TakeError))
    }
}

impl From<&io::Error> for ErrorKind {
    fn from(value: &io::Error) -> Self {
        if value.raw_os_error() == io::Error::from(Error::EINPROGRESS).raw_os_error() {
            Self::InProgress
        } else {
            Self::Std(value.kind())
        }
    }
}

// only used for unit tests
#[cfg(test)]
impl From<ErrorKind> for io::Error {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::InProgress => Self::from(Error::EINPROGRESS),
            ErrorKind::Std(kind) => Self::from(kind),
        }
    }
}
