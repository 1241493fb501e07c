//! In-memory history backend.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;

use crate::history::{sort_newest_first, HistorySink, StorageError};
use crate::probe::ProbeResult;

/// Results kept per target when no capacity is given.
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

/// Per-target result windows, kept for the lifetime of the process.
///
/// Each target holds at most `capacity` results; appending past that drops
/// the oldest one.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Arc<DashMap<String, VecDeque<ProbeResult>>>,
    capacity: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// `capacity` is clamped to at least one result per target.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of stored results across all targets.
    pub fn len(&self) -> usize {
        self.inner.iter().map(|r| r.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.iter().all(|r| r.value().is_empty())
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySink for MemoryHistory {
    fn append(&self, result: &ProbeResult) -> Result<(), StorageError> {
        let mut window = self.inner.entry(result.target.clone()).or_default();
        if window.len() >= self.capacity {
            window.pop_front();
        }
        window.push_back(result.clone());
        Ok(())
    }

    fn query(&self, target: &str) -> Result<Vec<ProbeResult>, StorageError> {
        let mut results: Vec<ProbeResult> = self
            .inner
            .get(target)
            .map(|r| r.value().iter().cloned().collect())
            .unwrap_or_default();
        sort_newest_first(&mut results);
        Ok(results)
    }
}
