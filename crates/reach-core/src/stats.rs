use std::time::Duration;

/// The statistics for a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    /// The number of probes sent.
    pub sent: usize,
    /// The number of replies received.
    pub received: usize,
    /// The percentage of probes lost.
    pub loss_pct: f64,
    /// The minimum round trip time observed.
    pub min: Duration,
    /// The mean round trip time observed.
    pub avg: Duration,
    /// The maximum round trip time observed.
    pub max: Duration,
    /// The round trip time of each successful probe, in completion order.
    pub rtts: Vec<Duration>,
}

/// Reduce the outcome of a run to a `RunStatistics`.
#[must_use]
pub fn compute_stats(sent: usize, received: usize, rtts: Vec<Duration>) -> RunStatistics {
    let loss_pct = if sent > 0 {
        100.0 * (sent - received) as f64 / sent as f64
    } else {
        0.0
    };
    let (min, avg, max) = if rtts.is_empty() {
        (Duration::ZERO, Duration::ZERO, Duration::ZERO)
    } else {
        let min = rtts.iter().min().copied().unwrap_or_default();
        let max = rtts.iter().max().copied().unwrap_or_default();
        let avg = rtts.iter().sum::<Duration>() / rtts.len() as u32;
        (min, avg, max)
    };
    RunStatistics {
        sent,
        received,
        loss_pct,
        min,
        avg,
        max,
        rtts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_empty_run() {
        let stats = compute_stats(0, 0, vec![]);
        assert_eq!(0, stats.sent);
        assert_eq!(0, stats.received);
        assert_eq!(0.0, stats.loss_pct);
        assert_eq!(Duration::ZERO, stats.min);
        assert_eq!(Duration::ZERO, stats.avg);
        assert_eq!(Duration::ZERO, stats.max);
        assert!(stats.rtts.is_empty());
    }

    #[test]
    fn test_all_replies() {
        let stats = compute_stats(5, 5, vec![ms(10), ms(20), ms(30)]);
        assert_eq!(ms(10), stats.min);
        assert_eq!(ms(20), stats.avg);
        assert_eq!(ms(30), stats.max);
        assert_eq!(0.0, stats.loss_pct);
    }

    #[test]
    fn test_partial_loss() {
        let stats = compute_stats(5, 3, vec![ms(5), ms(5), ms(5)]);
        assert_eq!(40.0, stats.loss_pct);
        assert_eq!(ms(5), stats.avg);
    }

    #[test]
    fn test_received_exceeds_samples() {
        let stats = compute_stats(5, 3, vec![ms(5)]);
        assert_eq!(5, stats.sent);
        assert_eq!(3, stats.received);
        assert_eq!(40.0, stats.loss_pct);
        assert_eq!(ms(5), stats.min);
        assert_eq!(ms(5), stats.avg);
        assert_eq!(ms(5), stats.max);
    }

    #[test]
    fn test_total_loss() {
        let stats = compute_stats(5, 0, vec![]);
        assert_eq!(100.0, stats.loss_pct);
        assert_eq!(Duration::ZERO, stats.min);
        assert_eq!(Duration::ZERO, stats.avg);
        assert_eq!(Duration::ZERO, stats.max);
    }

    #[test_case(vec![ms(1)]; "single sample")]
    #[test_case(vec![ms(1), ms(2)]; "two samples")]
    #[test_case(vec![ms(3), ms(1), ms(7), ms(2)]; "unordered samples")]
    fn test_min_avg_max_ordering(rtts: Vec<Duration>) {
        let stats = compute_stats(rtts.len(), rtts.len(), rtts);
        assert!(stats.min <= stats.avg);
        assert!(stats.avg <= stats.max);
    }
}
