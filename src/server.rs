use crate::types::{SecondCounts, ServerSnapshot};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, trace};

/// A service that rejects everything during an outage and then admits at
/// most `capacity` requests per whole second.
#[derive(Debug)]
pub struct Server {
    capacity: u64,
    outage: Duration,
    start: Instant,
    // Indexed by whole seconds since `start`
    seconds: Mutex<Vec<SecondCounts>>,
}

impl Server {
    pub fn new(capacity: u64, outage: Duration) -> Self {
        info!("🖥️ Server up: capacity={} req/s, outage={:?}", capacity, outage);
        Self {
            capacity,
            outage,
            start: Instant::now(),
            seconds: Mutex::new(Vec::new()),
        }
    }

    /// Classify one incoming request. Returns `true` when it was accepted.
    ///
    /// Every call is counted against the current second, whatever the
    /// outcome. The lock covers the whole classification so the acceptance
    /// count can never pass `capacity`.
    pub fn attempt(&self) -> bool {
        let mut seconds = self.seconds.lock();

        let elapsed = self.start.elapsed();
        let sec = elapsed.as_secs() as usize;
        if seconds.len() <= sec {
            seconds.resize(sec + 1, SecondCounts::default());
        }
        let counts = &mut seconds[sec];
        counts.requests += 1;

        if elapsed < self.outage {
            trace!(sec, "rejected: outage");
            return false;
        }
        if counts.accepted >= self.capacity {
            trace!(sec, "rejected: over capacity");
            return false;
        }
        counts.accepted += 1;
        true
    }

    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            capacity: self.capacity,
            outage: self.outage,
            seconds: self.seconds.lock().clone(),
        }
    }
}
