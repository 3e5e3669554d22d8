//! Atomic publication of health snapshots.
//!
//! Writers (a health checker) flip individual names; readers grab the
//! current snapshot once per request without locking.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::health::HealthSet;

/// Holds the latest [`HealthSet`] and swaps it on every change.
#[derive(Debug)]
pub struct HealthTracker {
    current: ArcSwap<HealthSet>,
}

impl HealthTracker {
    pub fn new(initial: HealthSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The snapshot to pass to the next selection.
    pub fn snapshot(&self) -> Arc<HealthSet> {
        self.current.load_full()
    }

    /// Mark a backend healthy or unhealthy. Returns true if the view changed.
    pub fn set_healthy(&self, name: &str, healthy: bool) -> bool {
        if self.current.load().contains(name) == healthy {
            return false;
        }

        // Only the writer whose swap actually flipped the name reports a change.
        let replaced = self.current.rcu(|cur| {
            let mut next = HealthSet::clone(cur);
            if healthy {
                next.insert(name);
            } else {
                next.remove(name);
            }
            next
        });
        if replaced.contains(name) == healthy {
            return false;
        }

        tracing::info!(backend = %name, healthy, "Backend health changed");
        true
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new(HealthSet::new())
    }
}
