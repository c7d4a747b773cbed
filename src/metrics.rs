use crate::types::MetricsSnapshot;
use parking_lot::Mutex;
use std::time::Duration;

/// Totals accumulated by every client as it reaches acceptance.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a client that was accepted after `wasted` rejections.
    pub fn record(&self, latency: Duration, wasted: u64) {
        let mut inner = self.inner.lock();
        inner.total_attempts += wasted + 1;
        inner.wasted_attempts += wasted;
        inner.latencies.push(latency);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().clone()
    }
}
