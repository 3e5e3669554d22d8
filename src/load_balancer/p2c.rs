//! Power-of-two-random-choices load balancing strategy.
//!
//! Two backends are drawn at random and the one with fewer in-flight
//! requests wins. Picking is constant time regardless of pool size, and
//! unlike least-connections it does not stampede onto one momentarily idle
//! backend when many balancers share imperfect load knowledge.

use std::sync::Arc;

use crate::health::HealthSet;
use crate::load_balancer::{
    backend::Backend,
    sampler::{Sampler, SamplerError, SeededSampler},
    LoadBalancer, SelectError,
};

/// Random attempts allowed per registered backend before falling back to a scan.
pub const DEFAULT_ATTEMPTS_PER_BACKEND: usize = 4;
/// Floor on random attempts, so tiny pools still get a fair number of draws.
pub const DEFAULT_MIN_ATTEMPTS: usize = 16;

/// P2C selector.
#[derive(Debug)]
pub struct PowerOfTwoChoices {
    backends: Vec<Arc<Backend>>,
    sampler: Box<dyn Sampler>,
    attempts_per_backend: usize,
    min_attempts: usize,
}

impl PowerOfTwoChoices {
    pub const NAME: &'static str = "p2c";

    /// Create a selector seeded from OS entropy.
    pub fn new() -> Result<Self, SamplerError> {
        Ok(Self::with_sampler(Box::new(SeededSampler::new()?)))
    }

    /// Create a selector drawing from the given sampler.
    pub fn with_sampler(sampler: Box<dyn Sampler>) -> Self {
        Self {
            backends: Vec::new(),
            sampler,
            attempts_per_backend: DEFAULT_ATTEMPTS_PER_BACKEND,
            min_attempts: DEFAULT_MIN_ATTEMPTS,
        }
    }

    /// Override the random-attempt budget.
    pub fn with_attempts(mut self, per_backend: usize, min: usize) -> Self {
        self.attempts_per_backend = per_backend;
        self.min_attempts = min;
        self
    }

    fn attempt_budget(&self) -> usize {
        self.backends
            .len()
            .saturating_mul(self.attempts_per_backend)
            .max(self.min_attempts)
    }

    fn find(&self, name: &str) -> Option<&Arc<Backend>> {
        self.backends.iter().find(|b| b.name == name)
    }

    /// Scan for every registered healthy backend and run one P2C round over them.
    fn select_from_healthy(&self, health: &HealthSet) -> Result<Arc<Backend>, SelectError> {
        let healthy: Vec<&Arc<Backend>> = self
            .backends
            .iter()
            .filter(|b| health.contains(&b.name))
            .collect();

        tracing::debug!(
            registered = self.backends.len(),
            healthy = healthy.len(),
            "p2c random attempts exhausted, scanning pool"
        );

        match healthy.len() {
            0 => Err(SelectError::NoHealthyBackend {
                strategy: Self::NAME,
            }),
            1 => Ok(healthy[0].clone()),
            n => {
                let i1 = self.sampler.int_n(n);
                let mut i2 = self.sampler.int_n(n - 1);
                if i2 >= i1 {
                    i2 += 1;
                }
                Ok(less_loaded(healthy[i1], healthy[i2]).clone())
            }
        }
    }
}

/// The backend with fewer in-flight requests; ties go to `first`.
fn less_loaded<'a>(first: &'a Arc<Backend>, second: &'a Arc<Backend>) -> &'a Arc<Backend> {
    if second.inflight() < first.inflight() {
        second
    } else {
        first
    }
}

impl LoadBalancer for PowerOfTwoChoices {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add(&mut self, backend: Arc<Backend>) {
        self.backends.push(backend);
    }

    fn len(&self) -> usize {
        self.backends.len()
    }

    fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    fn next_server(&self, health: &HealthSet) -> Result<Arc<Backend>, SelectError> {
        if self.backends.is_empty() {
            return Err(SelectError::EmptyPool);
        }

        // Only one healthy backend, so there is no choice to make.
        // Linear in pool size, which is expected to be small.
        if health.len() == 1 {
            if let Some(backend) = health.iter().next().and_then(|name| self.find(name)) {
                return Ok(backend.clone());
            }
        }

        let len = self.backends.len();
        if len > 1 {
            for _ in 0..self.attempt_budget() {
                let (n1, n2) = (self.sampler.int_n(len), self.sampler.int_n(len));
                if n1 == n2 {
                    continue;
                }

                let h1 = less_loaded(&self.backends[n1], &self.backends[n2]);
                if !health.contains(&h1.name) {
                    continue;
                }
                return Ok(h1.clone());
            }
        }

        self.select_from_healthy(health)
    }
}
