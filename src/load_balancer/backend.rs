//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream target by name
//! - Track in-flight requests (the load signal for P2C)
//! - Carry the static weight used by weighted round robin

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Unique name, matched against the health set.
    pub name: String,
    /// Weight for weighted round robin (ignored by P2C).
    pub weight: u32,
    /// Number of requests dispatched and not yet finished.
    inflight: AtomicUsize,
}

impl Backend {
    /// Create a new backend with weight 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_weight(name, 1)
    }

    /// Create a new backend with an explicit weight.
    pub fn with_weight(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            inflight: AtomicUsize::new(0),
        }
    }

    /// Get the current number of in-flight requests.
    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Relaxed)
    }

    /// Increment the in-flight count.
    pub fn inc_inflight(&self) {
        self.inflight.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement the in-flight count. Saturates at zero.
    pub fn dec_inflight(&self) {
        let _ = self
            .inflight
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Count a request as in flight until the returned guard is dropped.
    pub fn track(self: &Arc<Self>) -> InflightGuard {
        self.inc_inflight();
        InflightGuard {
            backend: self.clone(),
        }
    }
}

/// A RAII guard that manages the in-flight count.
///
/// Dropping it on success, failure, cancellation or unwind all count as the
/// request finishing.
#[derive(Debug)]
pub struct InflightGuard {
    backend: Arc<Backend>,
}

impl InflightGuard {
    /// The backend this request was dispatched to.
    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }
}

impl Deref for InflightGuard {
    type Target = Backend;
    fn deref(&self) -> &Self::Target {
        &self.backend
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.backend.dec_inflight();
    }
}
