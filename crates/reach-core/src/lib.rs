//! Reach - a host reachability probe library.
//!
//! This crate provides the core reachability probing facility used by the
//! standalone `reach` application.
//!
//! A run sends a fixed number of probes to a target host and reduces the
//! outcomes to a [`RunStatistics`].  When raw `ICMP` sockets are available the
//! probes are `ICMP` echo requests, when they are not the run falls back to
//! timing `TCP` connection establishment against the target.  The choice is
//! made once per run by probing for the privilege up front.
//!
//! # Example
//!
//! The following example builds and runs a pinger with default configuration
//! and prints the statistics for the run:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use reach_core::Builder;
//!
//! let stats = Builder::new("example.com").build()?.run()?;
//! println!("{}% packet loss", stats.loss_pct);
//! # Ok(())
//! # }
//! ```
//!
//! The following example observes the outcome of each probe as it completes:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use reach_core::Builder;
//!
//! let stats = Builder::new("example.com")
//!     .count(3)
//!     .build()?
//!     .run_with(|outcome| println!("{outcome:?}"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Pinger`].
//! - [`Pinger::run`] - Run the pinger on the current thread.
//! - [`Pinger::run_with`] - Run the pinger with a custom probe outcome handler.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![deny(unsafe_code)]

mod builder;
mod config;
mod constants;
mod error;
mod net;
mod pinger;
mod probe;
mod stats;
mod strategy;
mod types;

pub use builder::Builder;
pub use config::{defaults, PingConfig, PrivilegeMode};
pub use error::Error;
pub use pinger::Pinger;
pub use probe::{ProbeOutcome, ProbeProtocol};
pub use stats::RunStatistics;
pub use types::{PingId, Sequence};
