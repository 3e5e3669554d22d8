//! Backend pool management.
//!
//! # Responsibilities
//! - Build the configured strategy and register configured backends
//! - Select a backend per request against the caller's health snapshot
//! - Hand out in-flight guards for the forwarder

use std::sync::Arc;

use crate::config::BalancerConfig;
use crate::health::HealthSet;
use crate::load_balancer::{
    backend::{Backend, InflightGuard},
    create_load_balancer, LoadBalancer, SamplerError, SelectError,
};
use crate::observability::metrics;

/// A strategy plus its registered backends.
#[derive(Debug)]
pub struct BackendPool {
    balancer: Box<dyn LoadBalancer>,
}

impl BackendPool {
    /// Wrap an already populated balancer.
    pub fn new(balancer: Box<dyn LoadBalancer>) -> Self {
        Self { balancer }
    }

    /// Create the configured strategy and register every configured backend.
    pub fn from_config(config: &BalancerConfig) -> Result<Self, SamplerError> {
        let mut balancer = create_load_balancer(config.strategy, &config.selection)?;
        for backend in &config.backends {
            balancer.add(Arc::new(Backend::with_weight(
                backend.name.clone(),
                backend.weight,
            )));
        }

        tracing::info!(
            strategy = balancer.name(),
            backends = balancer.len(),
            "Backend pool ready"
        );
        Ok(Self { balancer })
    }

    pub fn strategy(&self) -> &'static str {
        self.balancer.name()
    }

    pub fn len(&self) -> usize {
        self.balancer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balancer.is_empty()
    }

    pub fn backends(&self) -> &[Arc<Backend>] {
        self.balancer.backends()
    }

    /// Select a backend and count the request as in flight.
    /// The count drops when the returned guard does.
    pub fn get(&self, health: &HealthSet) -> Result<InflightGuard, SelectError> {
        match self.balancer.next_server(health) {
            Ok(backend) => {
                metrics::record_selection(self.strategy(), &backend.name);
                Ok(backend.track())
            }
            Err(e) => {
                tracing::debug!(
                    strategy = self.strategy(),
                    registered = self.len(),
                    healthy = health.len(),
                    error = %e,
                    "No backend selected"
                );
                metrics::record_selection_failure(self.strategy());
                Err(e)
            }
        }
    }
}
