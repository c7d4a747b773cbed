use crate::client::client_task;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::server::Server;
use crate::strategy::Strategy;
use crate::types::MetricsSnapshot;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Run `num_clients` concurrent clients against `server` until all of them
/// have been accepted.
///
/// With a `seed`, client `i` draws from `StdRng::seed_from_u64(seed + i)`;
/// otherwise each client seeds from OS entropy.
pub async fn run_simulation(
    num_clients: usize,
    server: Arc<Server>,
    strategy: Strategy,
    seed: Option<u64>,
) -> Result<MetricsSnapshot> {
    info!("🚀 Spawning {} clients with {} strategy", num_clients, strategy);

    let metrics = Arc::new(Metrics::new());
    let mut join_set = JoinSet::new();

    for client_id in 0..num_clients {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(client_id as u64)),
            None => StdRng::from_entropy(),
        };
        let server = server.clone();
        let metrics = metrics.clone();

        join_set.spawn(async move {
            client_task(client_id, server, strategy, metrics, rng).await;
        });
    }

    while let Some(task_result) = join_set.join_next().await {
        if let Err(e) = task_result {
            error!("Client task failed: {:?}", e);
            join_set.abort_all();
            return Err(e.into());
        }
    }

    let snapshot = metrics.snapshot();
    info!(
        "✅ All {} clients served: {} attempts, {} wasted",
        snapshot.clients_served(),
        snapshot.total_attempts,
        snapshot.wasted_attempts
    );
    Ok(snapshot)
}
