use crate::config::{PingConfig, PrivilegeMode};
use crate::error::Result;
use crate::net::channel::Channel;
use crate::net::{privilege, SocketImpl};
use crate::probe::ProbeOutcome;
use crate::stats::{compute_stats, RunStatistics};
use crate::strategy::{ConnectStrategy, EchoStrategy};
use crate::types::PingId;
use reach_dns::{Resolver, SystemResolver};
use tracing::instrument;

/// A host reachability pinger.
///
/// Pingers are constructed via a [`crate::Builder`].
#[derive(Debug, Clone)]
pub struct Pinger {
    host: String,
    config: PingConfig,
}

impl Pinger {
    pub(crate) const fn new(host: String, config: PingConfig) -> Self {
        Self { host, config }
    }

    /// The target hostname.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configuration for the run.
    #[must_use]
    pub const fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Run the pinger on the current thread.
    ///
    /// Blocks until the run is complete and returns the statistics for it.
    pub fn run(&self) -> Result<RunStatistics> {
        self.run_with(|_| {})
    }

    /// Run the pinger with a custom probe outcome handler.
    ///
    /// The observer is called exactly once per probe, as soon as the outcome
    /// of that probe is decided.
    #[instrument(skip_all, level = "trace")]
    pub fn run_with<F: FnMut(&ProbeOutcome)>(&self, mut observer: F) -> Result<RunStatistics> {
        let target_addr = SystemResolver::new()
            .lookup(&self.host)?
            .into_iter()
            .next()
            .ok_or_else(|| reach_dns::Error::AddrNotFound(self.host.clone()))
            .map_err(crate::error::Error::Resolution)?;
        let ping_id = PingId(std::process::id() as u16);
        let privilege_mode = privilege::detect::<SocketImpl>()?;
        tracing::debug!(%target_addr, %privilege_mode, config = ?self.config);
        let mut sent = 0;
        let mut received = 0;
        let mut rtts = vec![];
        {
            let mut tally = |outcome: &ProbeOutcome| {
                if outcome.sent {
                    sent += 1;
                }
                if let Some(rtt) = outcome.rtt {
                    received += 1;
                    rtts.push(rtt);
                }
                observer(outcome);
            };
            match privilege_mode {
                PrivilegeMode::Privileged => {
                    let channel = Channel::<SocketImpl>::connect(target_addr)?;
                    EchoStrategy::new(channel, target_addr, ping_id, self.config)
                        .run(&mut tally)?;
                }
                PrivilegeMode::Unprivileged => {
                    ConnectStrategy::<SocketImpl>::new(target_addr, self.config)
                        .run(&mut tally)?;
                }
            }
        }
        Ok(compute_stats(sent, received, rtts))
    }
}
