//! Server Health Monitor Library
//!
//! Probes a fixed set of HTTP endpoints every interval, publishes the latest
//! complete round as a snapshot, and records every result for history
//! queries.

pub mod config;
pub mod history;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod scheduler;
pub mod snapshot;

pub use config::MonitorConfig;
pub use http::{HttpServer, MonitorService};
pub use lifecycle::Shutdown;
pub use probe::{Aggregator, Checker, ProbeResult};
pub use scheduler::Scheduler;
pub use snapshot::{Snapshot, SnapshotStore, SnapshotView};
