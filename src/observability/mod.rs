//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every probe failure is logged with its kind before being normalized
//! - Round IDs flow through scheduler logs for correlation
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
