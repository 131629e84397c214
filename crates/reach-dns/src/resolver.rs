use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// A hostname resolution error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A hostname resolution error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to resolve hostname {0}: {1}")]
    LookupFailed(String, std::io::Error),
    #[error("no address found for hostname {0}")]
    AddrNotFound(String),
}

/// Resolve a hostname to one or more IP addresses.
pub trait Resolver {
    /// Perform a forward DNS lookup of a hostname.
    ///
    /// If the hostname is a valid IPv4 or IPv6 address literal it is returned
    /// directly without consulting the resolver.
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs>;
}

/// The output of a successful forward DNS lookup.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedIpAddrs(pub(crate) Vec<IpAddr>);

impl ResolvedIpAddrs {
    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> + '_ {
        self.0.iter()
    }
}

impl Display for ResolvedIpAddrs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "unresolved"),
            [addr] => write!(f, "{addr}"),
            [addr, ..] => write!(f, "{addr} (+{} more)", self.0.len() - 1),
        }
    }
}

impl IntoIterator for ResolvedIpAddrs {
    type Item = IpAddr;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A resolver which delegates to the OS resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SystemResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs> {
        let hostname = hostname.as_ref();
        if let Ok(addr) = IpAddr::from_str(hostname) {
            return Ok(ResolvedIpAddrs(vec![addr]));
        }
        let addrs = dns_lookup::lookup_host(hostname)
            .map_err(|err| Error::LookupFailed(String::from(hostname), err))?;
        if addrs.is_empty() {
            return Err(Error::AddrNotFound(String::from(hostname)));
        }
        Ok(ResolvedIpAddrs(addrs))
    }
}
