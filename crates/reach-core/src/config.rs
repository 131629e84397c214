use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `count`.
    pub const DEFAULT_COUNT: usize = 5;

    /// The default value for `interval`.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    /// The default value for `timeout`.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

    /// The default value for `payload-size`.
    pub const DEFAULT_PAYLOAD_SIZE: u16 = 64;
}

/// The privilege mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrivilegeMode {
    /// Privileged mode.
    Privileged,
    /// Unprivileged mode.
    Unprivileged,
}

impl PrivilegeMode {
    #[must_use]
    pub const fn is_unprivileged(self) -> bool {
        match self {
            Self::Privileged => false,
            Self::Unprivileged => true,
        }
    }
}

impl Display for PrivilegeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Privileged => write!(f, "privileged"),
            Self::Unprivileged => write!(f, "unprivileged"),
        }
    }
}

/// Ping configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingConfig {
    /// The number of probes to send.
    pub count: usize,
    /// The duration to wait between probes.
    pub interval: Duration,
    /// The maximum duration to wait for each reply.
    pub timeout: Duration,
    /// The size of the echo request payload in bytes.
    pub payload_size: u16,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            count: defaults::DEFAULT_COUNT,
            interval: defaults::DEFAULT_INTERVAL,
            timeout: defaults::DEFAULT_TIMEOUT,
            payload_size: defaults::DEFAULT_PAYLOAD_SIZE,
        }
    }
}
