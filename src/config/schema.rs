//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::load_balancer::p2c::{DEFAULT_ATTEMPTS_PER_BACKEND, DEFAULT_MIN_ATTEMPTS};
use crate::load_balancer::Strategy;

/// Root configuration for the balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Balancing strategy token ("wrr" or "p2c").
    pub strategy: Strategy,

    /// Backend definitions, in registration order.
    pub backends: Vec<BackendConfig>,

    /// Tuning for randomized selection.
    pub selection: SelectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Workload replayed by the simulator binary.
    pub simulation: SimulationConfig,
}

/// Backend definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend name, as reported by the health tracker.
    pub name: String,

    /// Weight for weighted round robin (default: 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Randomized selection tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Random draws allowed per registered backend before scanning the pool.
    pub attempts_per_backend: usize,

    /// Minimum number of random draws regardless of pool size.
    pub min_attempts: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            attempts_per_backend: DEFAULT_ATTEMPTS_PER_BACKEND,
            min_attempts: DEFAULT_MIN_ATTEMPTS,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Simulated request workload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Total requests to dispatch.
    pub requests: usize,

    /// Concurrent request tasks.
    pub concurrency: usize,

    /// Lower bound of simulated backend latency in milliseconds.
    pub min_latency_ms: u64,

    /// Upper bound of simulated backend latency in milliseconds.
    pub max_latency_ms: u64,

    /// Backends reported unhealthy for the whole run.
    pub unhealthy: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            requests: 1_000,
            concurrency: 16,
            min_latency_ms: 1,
            max_latency_ms: 20,
            unhealthy: Vec::new(),
        }
    }
}
