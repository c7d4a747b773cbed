mod client;
mod config;
mod error;
mod logging;
mod metrics;
mod report;
mod server;
mod simulation;
mod strategy;
mod types;

use clap::Parser;
use config::*;
use report::{render_histogram, Summary};
use server::Server;
use simulation::run_simulation;
use std::sync::Arc;
use strategy::Strategy;
use tracing::info;

/// Compare how retry strategies recover a capacity-limited service after an outage.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Retry strategy: constant|backoff|jitter|decorrelated
    #[arg(long, default_value = "constant")]
    strategy: String,

    /// Seed the per-client random sources for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = Args::parse();

    let strategy: Strategy = match args.strategy.parse() {
        Ok(strategy) => strategy,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    println!(
        "  Strategy: {} | Clients: {} | Server capacity: {} req/s | Outage: {:?}",
        strategy, CLIENT_COUNT, SERVER_CAPACITY, OUTAGE_DURATION
    );

    let server = Arc::new(Server::new(SERVER_CAPACITY, OUTAGE_DURATION));
    let metrics = run_simulation(CLIENT_COUNT, server.clone(), strategy, args.seed).await?;

    let server = server.snapshot();
    info!("📊 Run covered {} seconds", server.seconds.len());

    print!("{}", render_histogram(&server));
    println!("{}", Summary::new(&server, &metrics));

    Ok(())
}
