use std::time::Duration;

/// Request and acceptance counts for one whole second of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecondCounts {
    pub requests: u64,
    pub accepted: u64,
}

impl SecondCounts {
    pub fn rejected(&self) -> u64 {
        self.requests - self.accepted
    }
}

/// Read-only copy of the server's state, indexed by second since start.
#[derive(Debug, Clone)]
pub struct ServerSnapshot {
    pub capacity: u64,
    pub outage: Duration,
    pub seconds: Vec<SecondCounts>,
}

impl ServerSnapshot {
    /// Counts for `second`, zero for seconds that saw no traffic.
    pub fn at(&self, second: u64) -> SecondCounts {
        usize::try_from(second)
            .ok()
            .and_then(|idx| self.seconds.get(idx))
            .copied()
            .unwrap_or_default()
    }

    /// Whole seconds covered by the outage.
    pub fn outage_secs(&self) -> u64 {
        self.outage.as_secs()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub total_attempts: u64,
    pub wasted_attempts: u64,
    pub latencies: Vec<Duration>,
}

impl MetricsSnapshot {
    pub fn clients_served(&self) -> usize {
        self.latencies.len()
    }
}
