//! Balancer simulator.
//!
//! Loads a balancer configuration, builds the backend pool and replays a
//! simulated workload against it, printing how requests were spread.
//!
//! ```text
//! balancer.toml → config::load_config → BackendPool::from_config
//!     → simulation::run (workers: snapshot health → pool.get → hold guard)
//!     → per-backend report (text or JSON)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use p2c_balancer::config::load_config;
use p2c_balancer::load_balancer::{BackendPool, Strategy};
use p2c_balancer::observability::{logging, metrics};
use p2c_balancer::{simulation, HealthTracker};

#[derive(Parser)]
#[command(name = "p2c-balancer")]
#[command(about = "Replay a simulated workload against a backend pool", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "balancer.toml")]
    config: PathBuf,

    /// Override the configured strategy ("wrr" or "p2c").
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Override the number of simulated requests.
    #[arg(short = 'n', long)]
    requests: Option<usize>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(requests) = cli.requests {
        config.simulation.requests = requests;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config = %cli.config.display(),
        strategy = %config.strategy,
        backends = config.backends.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let pool = Arc::new(BackendPool::from_config(&config)?);

    let tracker = Arc::new(HealthTracker::new(
        config.backends.iter().map(|b| b.name.clone()).collect(),
    ));
    for name in &config.simulation.unhealthy {
        tracker.set_healthy(name, false);
    }

    let report = simulation::run(pool, tracker, &config.simulation).await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
