//! Probing subsystem.
//!
//! # Data Flow
//! ```text
//! Round starts (scheduler)
//!     → aggregator.rs (one task per target)
//!         → checker.rs (GET with timeout, body drained)
//!         → ProbeResult (reachable / latency), failures normalized
//!         → history writer queue (not awaited by the join)
//!     → join all tasks
//!     → complete result set back to the scheduler
//! ```
//!
//! # Design Decisions
//! - One attempt per target per round; the next round is the retry
//! - Timeouts are per probe; there is no round-wide cancellation
//! - Latency is always within [0, timeout]

pub mod aggregator;
pub mod checker;
pub mod types;

pub use aggregator::Aggregator;
pub use checker::{Checker, Probe};
pub use types::{ProbeFailure, ProbeResult};
