//! This crate provides forward hostname resolution for reach.
//!
//! Resolution is performed via the system resolver and so honours the host
//! configuration in `/etc/resolv.conf` and `/etc/hosts`.  Hostnames which are
//! already valid IPv4 or IPv6 address literals short-circuit the resolver and
//! never touch the network.
//!
//! # Example
//!
//! The following example resolves a hostname and prints all addresses it
//! resolved to.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use reach_dns::{Resolver, SystemResolver};
//!
//! let resolver = SystemResolver::new();
//! for addr in resolver.lookup("example.com")? {
//!     println!("resolved to {addr}");
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod resolver;

pub use resolver::{Error, ResolvedIpAddrs, Resolver, Result, SystemResolver};
