//! Published state subsystem.
//!
//! # Data Flow
//! ```text
//! Round complete (scheduler)
//!     → Snapshot built outside any lock
//!     → store.rs publish (single pointer swap)
//!
//! API request
//!     → store.rs read
//!     → Empty | Ready(Arc<Snapshot>)
//! ```
//!
//! # Design Decisions
//! - One owned store, shared via Arc by the scheduler and the API
//! - Readers hold an Arc; a later publish never mutates what they hold
//! - Overlapping rounds resolve by PublishPolicy (last writer wins by default)

pub mod store;

pub use store::{Snapshot, SnapshotStore, SnapshotView};
