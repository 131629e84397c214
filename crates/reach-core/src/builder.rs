use crate::config::PingConfig;
use crate::constants::MAX_PAYLOAD_SIZE;
use crate::error::Result;
use crate::{Error, Pinger};
use std::time::Duration;

/// Build a pinger.
///
/// This is a convenience builder to simplify the creation and execution of a
/// pinger.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use std::time::Duration;
/// use reach_core::Builder;
///
/// let pinger = Builder::new("example.com")
///     .count(10)
///     .interval(Duration::from_millis(500))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Pinger`] - A host reachability probe.
#[derive(Debug)]
pub struct Builder {
    host: String,
    count: usize,
    interval: Duration,
    timeout: Duration,
    payload_size: u16,
}

impl Builder {
    /// Build a pinger builder for a given target host.
    ///
    /// The host may be a hostname or an IPv4 or IPv6 address literal.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use reach_core::Builder;
    ///
    /// let pinger = Builder::new("example.com").build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn new<S: Into<String>>(host: S) -> Self {
        let config = PingConfig::default();
        Self {
            host: host.into(),
            count: config.count,
            interval: config.interval,
            timeout: config.timeout,
            payload_size: config.payload_size,
        }
    }

    /// Set the number of probes to send.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use reach_core::Builder;
    ///
    /// let pinger = Builder::new("example.com").count(10).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    /// Set the duration to wait between probes.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use std::time::Duration;
    /// use reach_core::Builder;
    ///
    /// let pinger = Builder::new("example.com")
    ///     .interval(Duration::from_millis(500))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    /// Set the maximum duration to wait for each reply.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use std::time::Duration;
    /// use reach_core::Builder;
    ///
    /// let pinger = Builder::new("example.com")
    ///     .timeout(Duration::from_secs(5))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Set the size of the echo request payload in bytes.
    ///
    /// Payloads smaller than 8 bytes are padded to make room for the embedded
    /// send timestamp.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use reach_core::Builder;
    ///
    /// let pinger = Builder::new("example.com").payload_size(56).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn payload_size(self, payload_size: u16) -> Self {
        Self {
            payload_size,
            ..self
        }
    }

    /// Build the `Pinger`.
    pub fn build(self) -> Result<Pinger> {
        if self.count == 0 {
            return Err(Error::BadConfig("count may not be 0".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::BadConfig("timeout may not be 0".to_string()));
        }
        if usize::from(self.payload_size) > MAX_PAYLOAD_SIZE {
            return Err(Error::BadConfig(format!(
                "payload_size {} > {MAX_PAYLOAD_SIZE}",
                self.payload_size
            )));
        }
        Ok(Pinger::new(
            self.host,
            PingConfig {
                count: self.count,
                interval: self.interval,
                timeout: self.timeout,
                payload_size: self.payload_size,
            },
        ))
    }
}
