//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry and HTTP layers produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings, for registry decisions
//! - Request ID (x-request-id) attached to every request span
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
