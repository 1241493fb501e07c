//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Open history → Start scheduler → Bind API
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Scheduler stops ticking → API drains → Exit
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The API starts serving before the first round completes (503 until then)

pub mod shutdown;
pub mod signals;

pub use shutdown::{join_task, Shutdown};
