//! Read-side facade over the snapshot store and history sink.

use std::sync::Arc;

use thiserror::Error;

use crate::history::{HistorySink, StorageError};
use crate::probe::ProbeResult;
use crate::snapshot::{SnapshotStore, SnapshotView};

/// Why a history lookup produced nothing.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no results recorded for {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What the query layer is allowed to see.
#[derive(Clone)]
pub struct MonitorService {
    store: Arc<SnapshotStore>,
    history: Arc<dyn HistorySink>,
    max_results: usize,
}

impl MonitorService {
    /// `max_results` caps history responses; 0 means no cap.
    pub fn new(store: Arc<SnapshotStore>, history: Arc<dyn HistorySink>, max_results: usize) -> Self {
        Self {
            store,
            history,
            max_results,
        }
    }

    pub fn get_snapshot(&self) -> SnapshotView {
        self.store.read()
    }

    /// Results for `target`, newest first.
    pub async fn get_history(&self, target: &str) -> Result<Vec<ProbeResult>, HistoryError> {
        let history = self.history.clone();
        let key = target.to_string();
        let mut results = tokio::task::spawn_blocking(move || history.query(&key))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))??;

        if results.is_empty() {
            return Err(HistoryError::NotFound(target.to_string()));
        }
        if self.max_results > 0 {
            results.truncate(self.max_results);
        }
        Ok(results)
    }
}
