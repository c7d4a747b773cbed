//! Histogram and summary statistics derived from a finished run.
//!
//! Everything here works on snapshots, so it never contends with clients.

use crate::config::{HISTOGRAM_BAR_WIDTH, LATENCY_PERCENTILE, STABILITY_WINDOW_SECS};
use crate::types::{MetricsSnapshot, ServerSnapshot};
use std::fmt::{self, Write};
use std::time::Duration;

const BAR: char = '█';
const CAPACITY_MARK: char = '|';

/// Per-second request volume bar chart with the capacity column marked.
pub fn render_histogram(server: &ServerSnapshot) -> String {
    let mut out = String::new();

    let max_count = server.seconds.iter().map(|c| c.requests).max().unwrap_or(0);
    if server.seconds.is_empty() || max_count == 0 {
        out.push_str("  (no data)\n");
        return out;
    }

    let width = HISTOGRAM_BAR_WIDTH;
    let cap_mark = (server.capacity.saturating_mul(width) / max_count).min(width);
    let outage_secs = server.outage_secs();

    let _ = writeln!(
        out,
        "\n  Requests per second (capacity={} req/s marked with {})\n",
        server.capacity, CAPACITY_MARK
    );

    for (sec, counts) in server.seconds.iter().enumerate() {
        let filled = counts.requests * width / max_count;
        let mut bar: Vec<char> = (0..width)
            .map(|col| if col < filled { BAR } else { ' ' })
            .collect();
        if cap_mark < width {
            bar[cap_mark as usize] = CAPACITY_MARK;
        }
        let bar: String = bar.into_iter().collect();

        let label = if (sec as u64) < outage_secs { " DOWN" } else { "     " };
        let _ = writeln!(out, "  {:>3}s{} {} {}", sec, label, bar, counts.requests);
    }
    out.push('\n');
    out
}

/// Headline numbers for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Seconds after the outage until the first second with traffic and no
    /// rejections; `None` if that never happened within the scan window.
    pub time_to_stable: Option<u64>,
    pub peak_overshoot: u64,
    pub total_attempts: u64,
    pub wasted_attempts: u64,
    pub clients_served: usize,
    pub p99_latency: Duration,
}

impl Summary {
    pub fn new(server: &ServerSnapshot, metrics: &MetricsSnapshot) -> Self {
        Self {
            time_to_stable: time_to_stable(server),
            peak_overshoot: peak_overshoot(server),
            total_attempts: metrics.total_attempts,
            wasted_attempts: metrics.wasted_attempts,
            clients_served: metrics.clients_served(),
            p99_latency: p99(&metrics.latencies),
        }
    }
}

fn scan_window(server: &ServerSnapshot) -> std::ops::Range<u64> {
    let start = server.outage_secs();
    start..start + STABILITY_WINDOW_SECS
}

pub fn time_to_stable(server: &ServerSnapshot) -> Option<u64> {
    let outage_secs = server.outage_secs();
    scan_window(server)
        .find(|&sec| {
            let counts = server.at(sec);
            counts.requests > 0 && counts.rejected() == 0
        })
        .map(|sec| sec - outage_secs)
}

pub fn peak_overshoot(server: &ServerSnapshot) -> u64 {
    scan_window(server)
        .map(|sec| server.at(sec).requests.saturating_sub(server.capacity))
        .max()
        .unwrap_or(0)
}

/// 99th percentile at index `floor(0.99 * n)`, clamped to the last element.
pub fn p99(latencies: &[Duration]) -> Duration {
    if latencies.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();

    let idx = ((sorted.len() as f64 * LATENCY_PERCENTILE) as usize).min(sorted.len() - 1);
    sorted[idx]
}

fn round_to_millis(d: Duration) -> Duration {
    let micros = d.as_micros();
    let millis = (micros + 500) / 1_000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Summary")?;
        writeln!(f, "  -------")?;
        match self.time_to_stable {
            Some(secs) => writeln!(f, "  Time to stable             : {}s", secs)?,
            None => writeln!(f, "  Time to stable             : >{}s", STABILITY_WINDOW_SECS)?,
        }
        writeln!(f, "  Peak overshoot (reqs/s)    : {} over capacity", self.peak_overshoot)?;
        writeln!(f, "  Total requests             : {}", self.total_attempts)?;
        writeln!(f, "  Wasted (rejected) requests : {}", self.wasted_attempts)?;
        writeln!(f, "  Clients served             : {}", self.clients_served)?;
        writeln!(f, "  p99 client latency         : {:?}", round_to_millis(self.p99_latency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecondCounts;

    fn server_with(capacity: u64, outage_secs: u64, seconds: &[(u64, u64)]) -> ServerSnapshot {
        ServerSnapshot {
            capacity,
            outage: Duration::from_secs(outage_secs),
            seconds: seconds
                .iter()
                .map(|&(requests, accepted)| SecondCounts { requests, accepted })
                .collect(),
        }
    }

    #[test]
    fn stable_in_first_post_outage_second() {
        let server = server_with(5, 2, &[(40, 0), (40, 0), (3, 3)]);
        assert_eq!(time_to_stable(&server), Some(0));
    }

    #[test]
    fn stable_after_backlog_drains() {
        let server = server_with(5, 1, &[(9, 0), (9, 5), (4, 4), (1, 1)]);
        assert_eq!(time_to_stable(&server), Some(1));
    }

    #[test]
    fn silent_seconds_do_not_count_as_stable() {
        let server = server_with(5, 1, &[(9, 0), (0, 0), (6, 5), (5, 5)]);
        assert_eq!(time_to_stable(&server), Some(2));
    }

    #[test]
    fn unresolved_when_rejections_persist() {
        let seconds: Vec<_> = (0..80).map(|_| (10, 5)).collect();
        let server = server_with(5, 2, &seconds);
        assert_eq!(time_to_stable(&server), None);
    }

    #[test]
    fn peak_overshoot_is_excess_over_capacity() {
        let server = server_with(200, 1, &[(900, 0), (250, 200), (300, 200), (120, 120)]);
        assert_eq!(peak_overshoot(&server), 100);

        let server = server_with(200, 1, &[(900, 0), (250, 200)]);
        assert_eq!(peak_overshoot(&server), 50);
    }

    #[test]
    fn outage_traffic_is_not_overshoot() {
        let server = server_with(200, 2, &[(5_000, 0), (5_000, 0), (150, 150)]);
        assert_eq!(peak_overshoot(&server), 0);
    }

    #[test]
    fn p99_uses_floor_index() {
        let latencies: Vec<_> = (1..=100).rev().map(Duration::from_millis).collect();
        // floor(0.99 * 100) = 99, the last element
        assert_eq!(p99(&latencies), Duration::from_millis(100));

        let latencies: Vec<_> = (1..=1000).map(Duration::from_millis).collect();
        assert_eq!(p99(&latencies), Duration::from_millis(991));

        assert_eq!(p99(&[Duration::from_secs(3)]), Duration::from_secs(3));
        assert_eq!(p99(&[]), Duration::ZERO);
    }

    #[test]
    fn histogram_marks_capacity_and_outage() {
        let server = server_with(2, 1, &[(4, 0), (2, 2)]);
        let rendered = render_histogram(&server);
        let rows: Vec<&str> = rendered.lines().filter(|l| l.contains('█')).collect();

        assert!(rendered.contains("capacity=2 req/s"));
        assert_eq!(rows.len(), 2);

        let down = rows.iter().find(|l| l.trim_start().starts_with("0s DOWN")).unwrap();
        let bar: String = down.chars().skip("    0s DOWN ".len()).take(60).collect();
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 59);
        assert_eq!(bar.chars().nth(30), Some('|'));
        assert!(down.ends_with(" 4"));

        let up = rows.iter().find(|l| l.trim_start().starts_with("1s     ")).unwrap();
        let bar: String = up.chars().skip("    1s      ".len()).take(60).collect();
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 30);
        assert_eq!(bar.chars().nth(30), Some('|'));
        assert!(up.ends_with(" 2"));
    }

    #[test]
    fn histogram_omits_marker_when_capacity_exceeds_peak() {
        let server = server_with(100, 0, &[(10, 10), (5, 5)]);
        let rendered = render_histogram(&server);
        assert!(rendered.lines().skip(2).all(|l| !l.contains('|')));
    }

    #[test]
    fn histogram_without_requests() {
        let server = server_with(5, 2, &[]);
        assert_eq!(render_histogram(&server), "  (no data)\n");
    }

    #[test]
    fn summary_block_renders_unresolved() {
        let server = server_with(5, 1, &[(9, 0)]);
        let metrics = MetricsSnapshot {
            total_attempts: 12,
            wasted_attempts: 10,
            latencies: vec![Duration::from_micros(1_234_567), Duration::from_millis(10)],
        };
        let summary = Summary::new(&server, &metrics);
        assert_eq!(summary.time_to_stable, None);
        assert_eq!(summary.clients_served, 2);

        let text = summary.to_string();
        assert!(text.contains("Time to stable             : >60s"));
        assert!(text.contains("Wasted (rejected) requests : 10"));
        assert!(text.contains("p99 client latency         : 1.235s"));
    }
}
