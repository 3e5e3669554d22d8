//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Selection and startup produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap enough for the selection hot path
//! - No exporter installed means metric calls are no-ops

pub mod logging;
pub mod metrics;
