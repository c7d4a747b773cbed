use crate::config::BASE_DELAY;
use crate::metrics::Metrics;
use crate::server::Server;
use crate::strategy::Strategy;
use rand::Rng;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

/// Retry against `server` until accepted, then report to `metrics`.
///
/// There is no attempt limit: the server's per-second budget eventually
/// admits every client once the outage is over.
pub async fn client_task<R: Rng>(
    client_id: usize,
    server: Arc<Server>,
    strategy: Strategy,
    metrics: Arc<Metrics>,
    mut rng: R,
) {
    let start = Instant::now();
    let mut attempt: u32 = 0;
    let mut previous = BASE_DELAY;

    loop {
        if server.attempt() {
            let latency = start.elapsed();
            debug!("👤 Client {} accepted after {} retries in {:?}", client_id, attempt, latency);
            metrics.record(latency, u64::from(attempt));
            return;
        }

        let delay = strategy.next_delay(attempt, previous, &mut rng);
        trace!("👤 Client {} rejected (attempt {}), sleeping {:?}", client_id, attempt, delay);
        previous = delay;
        attempt = attempt.saturating_add(1);
        sleep(delay).await;
    }
}
