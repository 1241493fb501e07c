//! Fan-out aggregation of one round of probes.
//!
//! # Responsibilities
//! - Spawn one probe task per target
//! - Queue each result for history as soon as it exists
//! - Join every task before handing back a complete result set
//!
//! # Design Decisions
//! - Each task owns one pre-allocated slot (by target index); no locks
//! - A task that dies without reporting still yields an unreachable result
//! - Output order is the configured target order
//! - History writes happen off the join path; the round waits on probes only

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::history::HistoryWriter;
use crate::observability::metrics;
use crate::probe::checker::{Checker, Probe};
use crate::probe::types::{clamp_latency, ProbeFailure, ProbeResult};

/// Runs one probe per target in parallel and collects the full set.
pub struct Aggregator<P = Checker> {
    probe: Arc<P>,
    history: HistoryWriter,
}

impl<P: Probe> Aggregator<P> {
    pub fn new(probe: P, history: HistoryWriter) -> Self {
        Self {
            probe: Arc::new(probe),
            history,
        }
    }

    /// Probe every target once and wait for all of them.
    ///
    /// Always returns exactly `targets.len()` results, in target order.
    pub async fn run_round(&self, targets: &[String], timeout: Duration) -> Vec<ProbeResult> {
        let started = Instant::now();
        let mut slots: Vec<Option<ProbeResult>> = vec![None; targets.len()];
        let mut tasks = JoinSet::new();

        for (index, target) in targets.iter().enumerate() {
            let probe = self.probe.clone();
            let history = self.history.clone();
            let target = target.clone();

            tasks.spawn(async move {
                let result = probe.check(&target, timeout).await;
                history.record(result.clone());
                (index, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => {
                    tracing::error!(error = %e, "Probe task did not complete");
                }
            }
        }

        let mut results = Vec::with_capacity(targets.len());
        for (target, slot) in targets.iter().zip(slots) {
            match slot {
                Some(result) => results.push(result),
                None => {
                    let failure = ProbeFailure::Aborted("task exited without a result".into());
                    let latency = clamp_latency(started.elapsed(), timeout);
                    tracing::warn!(url = %target, kind = failure.kind(), "Probe failed: {}", failure);

                    let result = ProbeResult::unreachable(target.clone(), latency);
                    metrics::record_probe(&result);
                    self.history.record(result.clone());
                    results.push(result);
                }
            }
        }

        results
    }
}
