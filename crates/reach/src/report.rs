use humantime::format_duration;
use reach_core::{ProbeOutcome, ProbeProtocol, RunStatistics};

/// Write a per-probe line and a final summary to stdout.
pub struct Reporter {
    host: String,
    fallback_notified: bool,
}

impl Reporter {
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            fallback_notified: false,
        }
    }

    /// Report the outcome of a single probe.
    ///
    /// Probes which received no reply produce no line.
    pub fn on_probe(&mut self, outcome: &ProbeOutcome) {
        if outcome.protocol == ProbeProtocol::Tcp && !self.fallback_notified {
            println!("ICMP not permitted, falling back to TCP");
            self.fallback_notified = true;
        }
        if let Some(line) = probe_line(outcome) {
            println!("{line}");
        }
    }

    /// Report the summary for the completed run.
    pub fn summary(&self, stats: &RunStatistics) {
        println!("--- {} ping statistics ---", self.host);
        println!(
            "{} packets transmitted, {} received, {:.1}% packet loss",
            stats.sent, stats.received, stats.loss_pct
        );
        if stats.received > 0 {
            println!(
                "RTT min/avg/max = {}/{}/{}",
                format_duration(stats.min),
                format_duration(stats.avg),
                format_duration(stats.max)
            );
        }
    }
}

/// Format the per-probe line, the same for both probe protocols.
fn probe_line(outcome: &ProbeOutcome) -> Option<String> {
    let rtt = outcome.rtt?;
    Some(format!(
        "{} bytes from {}: icmp_seq={} time={}",
        outcome.bytes,
        outcome.addr,
        outcome.sequence.0,
        format_duration(rtt)
    ))
}
