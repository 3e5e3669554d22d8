//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_selections_total` (counter): picks by strategy, backend
//! - `balancer_selection_failures_total` (counter): failed picks by strategy
//! - `balancer_backend_inflight` (gauge): in-flight requests per backend

use std::net::SocketAddr;

use ::metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_selection(strategy: &'static str, backend: &str) {
    counter!(
        "balancer_selections_total",
        "strategy" => strategy,
        "backend" => backend.to_string()
    )
    .increment(1);
}

pub fn record_selection_failure(strategy: &'static str) {
    counter!("balancer_selection_failures_total", "strategy" => strategy).increment(1);
}

pub fn record_inflight(backend: &str, inflight: usize) {
    gauge!("balancer_backend_inflight", "backend" => backend.to_string()).set(inflight as f64);
}
