//! Latest-snapshot store.
//!
//! # Responsibilities
//! - Hold the most recent complete round
//! - Publish by swapping a single pointer
//! - Hand readers a shared reference, never a partially built set

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::PublishPolicy;
use crate::probe::ProbeResult;

/// One complete round: exactly one result per configured target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    round_id: Uuid,
    sequence: u64,
    started_at: DateTime<Utc>,
    results: Vec<ProbeResult>,
}

impl Snapshot {
    /// `sequence` orders rounds by start; it is what the monotonic policy
    /// compares.
    pub fn new(
        round_id: Uuid,
        sequence: u64,
        started_at: DateTime<Utc>,
        results: Vec<ProbeResult>,
    ) -> Self {
        Self {
            round_id,
            sequence,
            started_at,
            results,
        }
    }

    pub fn round_id(&self) -> Uuid {
        self.round_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Look up the result for one target.
    pub fn get(&self, target: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.target == target)
    }
}

/// What a reader sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotView {
    /// No round has completed yet.
    Empty,
    Ready(Arc<Snapshot>),
}

impl SnapshotView {
    pub fn is_empty(&self) -> bool {
        matches!(self, SnapshotView::Empty)
    }

    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            SnapshotView::Empty => None,
            SnapshotView::Ready(snapshot) => Some(snapshot),
        }
    }
}

/// Holds the currently visible snapshot.
///
/// Writers build a `Snapshot` entirely outside the store and publish it with
/// one atomic swap; readers get an `Arc` to whichever snapshot was current.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
    policy: PublishPolicy,
}

impl SnapshotStore {
    pub fn new(policy: PublishPolicy) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            policy,
        }
    }

    pub fn policy(&self) -> PublishPolicy {
        self.policy
    }

    /// Make `snapshot` visible. Returns false if the monotonic policy kept a
    /// newer round in place.
    pub fn publish(&self, snapshot: Snapshot) -> bool {
        let candidate = Arc::new(snapshot);

        match self.policy {
            PublishPolicy::LastWriterWins => {
                self.current.store(Some(candidate));
                true
            }
            PublishPolicy::Monotonic => {
                let mut published = false;
                self.current.rcu(|current| match current {
                    Some(existing) if existing.sequence >= candidate.sequence => {
                        published = false;
                        Some(existing.clone())
                    }
                    _ => {
                        published = true;
                        Some(candidate.clone())
                    }
                });
                published
            }
        }
    }

    /// The latest published snapshot, or `Empty` before the first round.
    pub fn read(&self) -> SnapshotView {
        match self.current.load_full() {
            Some(snapshot) => SnapshotView::Ready(snapshot),
            None => SnapshotView::Empty,
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(PublishPolicy::default())
    }
}
