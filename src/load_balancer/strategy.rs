//! Strategy registry: configuration tokens to implementations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::SelectionConfig;
use crate::load_balancer::{
    LoadBalancer, PowerOfTwoChoices, Sampler, SamplerError, SeededSampler, WeightedRoundRobin,
};

/// Known balancing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Strategy {
    /// Smooth weighted round robin.
    #[default]
    #[serde(rename = "wrr")]
    WeightedRoundRobin,
    /// Power of two random choices.
    #[serde(rename = "p2c")]
    PowerOfTwoChoices,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::WeightedRoundRobin, Strategy::PowerOfTwoChoices];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::WeightedRoundRobin => WeightedRoundRobin::NAME,
            Strategy::PowerOfTwoChoices => PowerOfTwoChoices::NAME,
        }
    }

    /// Whether `token` names a known strategy.
    pub fn is_valid(token: &str) -> bool {
        token.parse::<Strategy>().is_ok()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown balancing strategy {0:?} (expected \"wrr\" or \"p2c\")")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Build an empty balancer for `strategy`.
///
/// Fails only if the random sampler cannot be seeded.
pub fn create_load_balancer(
    strategy: Strategy,
    selection: &SelectionConfig,
) -> Result<Box<dyn LoadBalancer>, SamplerError> {
    let lb: Box<dyn LoadBalancer> = match strategy {
        Strategy::WeightedRoundRobin => Box::new(WeightedRoundRobin::new()),
        Strategy::PowerOfTwoChoices => {
            Box::new(configured_p2c(Box::new(SeededSampler::new()?), selection))
        }
    };
    Ok(lb)
}

fn configured_p2c(sampler: Box<dyn Sampler>, selection: &SelectionConfig) -> PowerOfTwoChoices {
    PowerOfTwoChoices::with_sampler(sampler)
        .with_attempts(selection.attempts_per_backend, selection.min_attempts)
}
