//! Health view consumed by selection.
//!
//! # Data Flow
//! ```text
//! External health checker
//!     → tracker.rs (publish a new snapshot atomically)
//!     → HealthSet (immutable, one per request)
//!     → load_balancer::LoadBalancer::next_server
//! ```
//!
//! # Design Decisions
//! - Selection never caches health; every call gets a fresh snapshot
//! - A name in the set means "healthy now", absence means "skip it"
//! - Names that match no registered backend are ignored

pub mod tracker;

use std::collections::HashSet;

pub use tracker::HealthTracker;

/// Snapshot of backend names currently eligible for traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthSet {
    names: HashSet<String>,
}

impl HealthSet {
    /// An empty set (no backend healthy).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }
}

impl<S: Into<String>> FromIterator<S> for HealthSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
