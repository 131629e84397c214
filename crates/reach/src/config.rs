use clap::Parser;
use std::time::Duration;

/// Probe a host for reachability and record statistics
#[derive(Parser, Debug)]
#[command(name = "reach", author, version, about, long_about = None)]
pub struct Args {
    /// The hostname or IP address to probe
    pub host: String,

    /// The number of probes to send
    #[arg(short = 'c', long, default_value_t = 5)]
    pub count: usize,

    /// The duration to wait between probes
    #[arg(short = 'i', long, value_parser = parse_duration, default_value = "1s")]
    pub interval: Duration,

    /// The maximum duration to wait for each reply
    #[arg(short = 't', long, value_parser = parse_duration, default_value = "10s")]
    pub timeout: Duration,

    /// The size of the probe payload in bytes
    #[arg(short = 's', long, default_value_t = 64)]
    pub size: u16,

    /// Enable verbose debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    Ok(humantime::parse_duration(value)?)
}
