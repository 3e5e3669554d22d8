//! Shared utilities for integration tests.

use std::sync::Arc;

use p2c_balancer::load_balancer::{Backend, LoadBalancer};
use p2c_balancer::HealthSet;

/// Register one backend per name and return them in order.
#[allow(dead_code)]
pub fn register(lb: &mut dyn LoadBalancer, names: &[&str]) -> Vec<Arc<Backend>> {
    names
        .iter()
        .map(|name| {
            let backend = Arc::new(Backend::new(*name));
            lb.add(backend.clone());
            backend
        })
        .collect()
}

#[allow(dead_code)]
pub fn health(names: &[&str]) -> HealthSet {
    names.iter().copied().collect()
}

/// Raise a backend's in-flight count without holding guards.
#[allow(dead_code)]
pub fn load(backend: &Backend, n: usize) {
    for _ in 0..n {
        backend.inc_inflight();
    }
}
