//! Periodic round driver.
//!
//! # Responsibilities
//! - Run one round immediately, then one per interval
//! - Start each round independently of whether the last one finished
//! - Publish each completed round to the snapshot store

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::observability::metrics;
use crate::probe::Aggregator;
use crate::snapshot::{Snapshot, SnapshotStore};

/// Per-round progress, logged as the round moves through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Dispatched,
    AwaitingAll,
    Complete { published: bool },
}

/// What a finished round reports back.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round_id: Uuid,
    pub sequence: u64,
    pub state: RoundState,
    pub duration: Duration,
    pub results: usize,
}

/// Drives rounds on a fixed interval.
///
/// Overlap policy: ticks never wait for earlier rounds. A round that runs
/// past the interval overlaps the next one, and whichever finishes last
/// publishes last unless the store is monotonic.
#[derive(Clone)]
pub struct Scheduler {
    aggregator: Arc<Aggregator>,
    store: Arc<SnapshotStore>,
    targets: Arc<[String]>,
    interval: Duration,
    timeout: Duration,
    next_sequence: Arc<AtomicU64>,
}

impl Scheduler {
    pub fn new(
        aggregator: Arc<Aggregator>,
        store: Arc<SnapshotStore>,
        targets: Vec<String>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            aggregator,
            store,
            targets: targets.into(),
            interval: config.interval(),
            timeout: config.probe_timeout(),
            next_sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Run until shutdown: one round right away, then one per tick.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            targets = self.targets.len(),
            interval = ?self.interval,
            timeout = ?self.timeout,
            policy = ?self.store.policy(),
            "Scheduler starting"
        );

        self.run_round().await;

        let start = time::Instant::now() + self.interval;
        let mut ticker = time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let scheduler = self.clone();
                    tokio::spawn(async move {
                        scheduler.run_round().await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Execute one complete round and publish it.
    pub async fn run_round(&self) -> RoundOutcome {
        let round_id = Uuid::new_v4();
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let started_at = Utc::now();
        let started = Instant::now();

        tracing::debug!(%round_id, sequence, state = ?RoundState::Dispatched, targets = self.targets.len(), "Round dispatched");
        let pending = self.aggregator.run_round(&self.targets, self.timeout);
        tracing::debug!(%round_id, sequence, state = ?RoundState::AwaitingAll, "Awaiting probes");
        let results = pending.await;

        let reachable = results.iter().filter(|r| r.reachable).count();
        let count = results.len();
        let published = self
            .store
            .publish(Snapshot::new(round_id, sequence, started_at, results));
        let duration = started.elapsed();
        let state = RoundState::Complete { published };

        metrics::record_round(duration, published);
        if published {
            tracing::info!(
                %round_id,
                sequence,
                reachable,
                unreachable = count - reachable,
                duration = ?duration,
                "Round complete"
            );
        } else {
            tracing::info!(
                %round_id,
                sequence,
                duration = ?duration,
                "Round complete but a newer round is already published"
            );
        }

        RoundOutcome {
            round_id,
            sequence,
            state,
            duration,
            results: count,
        }
    }
}
