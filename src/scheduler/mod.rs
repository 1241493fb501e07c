//! Round scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → runner.rs immediate round
//!     → every interval: spawn a new round
//!
//! Round:
//!     Dispatched → AwaitingAll → Complete(published?)
//!     → aggregator (probe every target, join all)
//!     → snapshot store publish
//! ```
//!
//! # Design Decisions
//! - Rounds never wait on each other; slow rounds overlap the next tick
//! - Every dispatched round reaches Complete; probe failures are data
//! - No retries inside a round

pub mod runner;

pub use runner::{RoundOutcome, RoundState, Scheduler};
