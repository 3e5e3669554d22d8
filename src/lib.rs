//! Health-aware backend selection for a reverse proxy.
//!
//! The core is the power-of-two-random-choices strategy in
//! [`load_balancer::p2c`]; a weighted round-robin strategy shares the same
//! [`load_balancer::LoadBalancer`] contract and both are reachable through
//! the [`load_balancer::Strategy`] registry.

pub mod config;
pub mod health;
pub mod load_balancer;
pub mod observability;
pub mod simulation;

pub use config::BalancerConfig;
pub use health::{HealthSet, HealthTracker};
pub use load_balancer::{Backend, BackendPool, LoadBalancer, SelectError, Strategy};
