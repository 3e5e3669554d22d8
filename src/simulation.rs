//! Simulated request workload.
//!
//! Plays the request forwarder: each worker takes a health snapshot, asks
//! the pool for a backend, holds the in-flight guard for a random latency
//! and drops it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::task::JoinSet;

use crate::config::SimulationConfig;
use crate::health::HealthTracker;
use crate::load_balancer::BackendPool;
use crate::observability::metrics;

/// Outcome of a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub strategy: &'static str,
    pub requests: usize,
    pub failures: usize,
    pub elapsed_ms: u64,
    pub backends: Vec<BackendReport>,
}

/// Per-backend share of a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct BackendReport {
    pub name: String,
    pub picks: usize,
    pub healthy: bool,
    /// In-flight count left after the run; non-zero means a leaked guard.
    pub inflight: usize,
}

#[derive(Default)]
struct WorkerTally {
    picks: HashMap<String, usize>,
    failures: usize,
}

/// Dispatch `sim.requests` requests across `sim.concurrency` workers.
pub async fn run(
    pool: Arc<BackendPool>,
    health: Arc<HealthTracker>,
    sim: &SimulationConfig,
) -> SimulationReport {
    let started = Instant::now();
    let dispatched = Arc::new(AtomicUsize::new(0));
    let total = sim.requests;
    let latency = sim.min_latency_ms..=sim.max_latency_ms.max(sim.min_latency_ms);

    tracing::info!(
        strategy = pool.strategy(),
        requests = total,
        concurrency = sim.concurrency,
        "Simulation starting"
    );

    let mut workers = JoinSet::new();
    for _ in 0..sim.concurrency.max(1) {
        let pool = pool.clone();
        let health = health.clone();
        let dispatched = dispatched.clone();
        let latency = latency.clone();

        workers.spawn(async move {
            let mut tally = WorkerTally::default();
            while dispatched.fetch_add(1, Ordering::Relaxed) < total {
                let snapshot = health.snapshot();
                match pool.get(&snapshot) {
                    Ok(guard) => {
                        *tally.picks.entry(guard.name.clone()).or_default() += 1;
                        metrics::record_inflight(&guard.name, guard.inflight());
                        let ms = fastrand::u64(latency.clone());
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                    Err(_) => tally.failures += 1,
                }
            }
            tally
        });
    }

    let mut picks: HashMap<String, usize> = HashMap::new();
    let mut failures = 0;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(tally) => {
                for (name, n) in tally.picks {
                    *picks.entry(name).or_default() += n;
                }
                failures += tally.failures;
            }
            Err(e) => tracing::error!(error = %e, "Simulation worker failed"),
        }
    }

    let snapshot = health.snapshot();
    let backends = pool
        .backends()
        .iter()
        .map(|b| BackendReport {
            name: b.name.clone(),
            picks: picks.get(&b.name).copied().unwrap_or(0),
            healthy: snapshot.contains(&b.name),
            inflight: b.inflight(),
        })
        .collect();

    let report = SimulationReport {
        strategy: pool.strategy(),
        requests: total,
        failures,
        elapsed_ms: started.elapsed().as_millis() as u64,
        backends,
    };
    tracing::info!(failures, elapsed_ms = report.elapsed_ms, "Simulation finished");
    report
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "strategy={} requests={} failures={} elapsed={}ms",
            self.strategy, self.requests, self.failures, self.elapsed_ms
        )?;
        for b in &self.backends {
            let share = if self.requests == 0 {
                0.0
            } else {
                b.picks as f64 * 100.0 / self.requests as f64
            };
            writeln!(
                f,
                "  {:<20} {:>8} picks {:>6.1}%  {}",
                b.name,
                b.picks,
                share,
                if b.healthy { "healthy" } else { "unhealthy" }
            )?;
        }
        Ok(())
    }
}
