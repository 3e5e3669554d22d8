//! Weighted round-robin load balancing strategy.

use std::sync::{Arc, Mutex, PoisonError};

use crate::health::HealthSet;
use crate::load_balancer::{backend::Backend, LoadBalancer, SelectError};

/// Smooth weighted round-robin selector.
///
/// Every pick adds each healthy backend's weight to its running score, takes
/// the highest score and charges it the total weight. Over a cycle each
/// backend is picked in proportion to its weight, interleaved rather than
/// in bursts.
#[derive(Debug, Default)]
pub struct WeightedRoundRobin {
    backends: Vec<Arc<Backend>>,
    scores: Mutex<Vec<i64>>,
}

impl WeightedRoundRobin {
    pub const NAME: &'static str = "wrr";

    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for WeightedRoundRobin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add(&mut self, backend: Arc<Backend>) {
        self.backends.push(backend);
        self.scores
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push(0);
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

        let mut scores = self.scores.lock().unwrap_or_else(PoisonError::into_inner);
        let mut total = 0i64;
        let mut best: Option<usize> = None;

        for (i, backend) in self.backends.iter().enumerate() {
            if backend.weight == 0 || !health.contains(&backend.name) {
                continue;
            }
            let weight = i64::from(backend.weight);
            scores[i] += weight;
            total += weight;
            if best.map_or(true, |j| scores[i] > scores[j]) {
                best = Some(i);
            }
        }

        match best {
            Some(i) => {
                scores[i] -= total;
                Ok(self.backends[i].clone())
            }
            None => Err(SelectError::NoHealthyBackend {
                strategy: Self::NAME,
            }),
        }
    }
}
