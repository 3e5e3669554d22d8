//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     config strategy token → strategy.rs (validate "wrr" / "p2c")
//!     → create_load_balancer → add() each configured backend
//!
//! Per request:
//!     HealthSet snapshot → LoadBalancer::next_server
//!         - p2c.rs (two random picks, fewer in-flight wins)
//!         - weighted_round_robin.rs (smooth weighted rotation)
//!     → pool.rs wraps the pick in an InflightGuard
//! ```
//!
//! # Design Decisions
//! - Strategies own their backend list; registration needs `&mut self`
//! - Selection is `&self` and lock-free apart from the rng / rotation state
//! - Unhealthy backends are never returned; exhaustion is an error, not a hang

pub mod backend;
pub mod p2c;
pub mod pool;
pub mod sampler;
pub mod strategy;
pub mod weighted_round_robin;

use std::sync::Arc;

use thiserror::Error;

use crate::health::HealthSet;

pub use backend::{Backend, InflightGuard};
pub use p2c::PowerOfTwoChoices;
pub use pool::BackendPool;
pub use sampler::{Sampler, SamplerError, SeededSampler};
pub use strategy::{create_load_balancer, Strategy, UnknownStrategy};
pub use weighted_round_robin::WeightedRoundRobin;

/// Why a selection produced no backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no backends registered")]
    EmptyPool,

    #[error("no healthy backend available ({strategy})")]
    NoHealthyBackend { strategy: &'static str },
}

/// A backend selection strategy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Configuration token identifying the strategy.
    fn name(&self) -> &'static str;

    /// Register a backend. Callers must not register a name twice.
    fn add(&mut self, backend: Arc<Backend>);

    /// Number of registered backends.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered backends in registration order.
    fn backends(&self) -> &[Arc<Backend>];

    /// Pick the backend for the next request among those in `health`.
    fn next_server(&self, health: &HealthSet) -> Result<Arc<Backend>, SelectError>;
}
