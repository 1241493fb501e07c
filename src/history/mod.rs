//! Probe history subsystem.
//!
//! # Data Flow
//! ```text
//! Probe task finishes
//!     → HistoryWriter::record (bounded queue, never waits)
//!     → writer task → HistorySink::append (every result, every round)
//!
//! History query (API)
//!     → HistorySink::query(target)
//!     → results for that target, newest first
//! ```
//!
//! # Design Decisions
//! - Append failures are logged by the writer task and never fail a round
//! - Query failures surface to the API as service-unavailable
//! - Backends are synchronous; async callers go through `spawn_blocking`

pub mod file;
pub mod memory;
pub mod writer;

use std::sync::Arc;

use thiserror::Error;

use crate::config::{HistoryBackend, HistoryConfig};
use crate::probe::ProbeResult;

pub use file::FileHistory;
pub use memory::MemoryHistory;
pub use writer::HistoryWriter;

/// Errors raised by a history backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("history backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable, append-only store of probe results.
pub trait HistorySink: Send + Sync {
    /// Record one result.
    fn append(&self, result: &ProbeResult) -> Result<(), StorageError>;

    /// All results recorded for `target`, sorted by timestamp descending.
    fn query(&self, target: &str) -> Result<Vec<ProbeResult>, StorageError>;
}

/// Open the backend selected in configuration.
pub fn open_sink(config: &HistoryConfig) -> Result<Arc<dyn HistorySink>, StorageError> {
    let sink: Arc<dyn HistorySink> = match config.backend {
        HistoryBackend::Memory => Arc::new(MemoryHistory::with_capacity(config.memory_capacity)),
        HistoryBackend::File => Arc::new(FileHistory::open(&config.path)?),
    };
    tracing::info!(backend = ?config.backend, "History sink ready");
    Ok(sink)
}

/// Reorder results given in append order so the newest comes first. Among
/// equal timestamps the later append wins.
pub(crate) fn sort_newest_first(results: &mut [ProbeResult]) {
    results.reverse();
    results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
