//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend names present and unique, weights non-zero
//! - Value ranges for selection tuning and the simulated workload
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::BalancerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one backend is required")]
    NoBackends,

    #[error("backend #{0} has an empty name")]
    EmptyName(usize),

    #[error("backend {0:?} is defined more than once")]
    DuplicateBackend(String),

    #[error("backend {0:?} has weight 0")]
    ZeroWeight(String),

    #[error("selection attempt budget must be non-zero")]
    ZeroAttemptBudget,

    #[error("simulation concurrency must be non-zero")]
    ZeroConcurrency,

    #[error("simulation latency range {min}..={max} ms is empty")]
    LatencyRange { min: u64, max: u64 },

    #[error("simulation marks unknown backend {0:?} unhealthy")]
    UnknownUnhealthy(String),
}

pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    let mut seen = HashSet::new();
    for (i, backend) in config.backends.iter().enumerate() {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyName(i));
            continue;
        }
        if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }
        if backend.weight == 0 {
            errors.push(ValidationError::ZeroWeight(backend.name.clone()));
        }
    }

    let selection = &config.selection;
    if selection.attempts_per_backend == 0 && selection.min_attempts == 0 {
        errors.push(ValidationError::ZeroAttemptBudget);
    }

    let sim = &config.simulation;
    if sim.concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }
    if sim.min_latency_ms > sim.max_latency_ms {
        errors.push(ValidationError::LatencyRange {
            min: sim.min_latency_ms,
            max: sim.max_latency_ms,
        });
    }
    for name in &sim.unhealthy {
        if !seen.contains(name.as_str()) {
            errors.push(ValidationError::UnknownUnhealthy(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;

    fn backend(name: &str, weight: u32) -> BackendConfig {
        BackendConfig {
            name: name.to_string(),
            weight,
        }
    }

    #[test]
    fn test_default_config_needs_backends() {
        let errors = validate_config(&BalancerConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoBackends]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BalancerConfig::default();
        config.backends = vec![backend("a", 1), backend("", 1), backend("a", 0)];
        config.selection.attempts_per_backend = 0;
        config.selection.min_attempts = 0;
        config.simulation.concurrency = 0;
        config.simulation.min_latency_ms = 10;
        config.simulation.max_latency_ms = 5;
        config.simulation.unhealthy = vec!["ghost".to_string()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyName(1),
                ValidationError::DuplicateBackend("a".into()),
                ValidationError::ZeroWeight("a".into()),
                ValidationError::ZeroAttemptBudget,
                ValidationError::ZeroConcurrency,
                ValidationError::LatencyRange { min: 10, max: 5 },
                ValidationError::UnknownUnhealthy("ghost".into()),
            ]
        );
    }

    #[test]
    fn test_valid_config() {
        let mut config = BalancerConfig::default();
        config.backends = vec![backend("a", 1), backend("b", 3)];
        config.simulation.unhealthy = vec!["b".to_string()];
        assert!(validate_config(&config).is_ok());
    }
}
