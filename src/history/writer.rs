//! Background history writer.
//!
//! Probe tasks queue results and move on. One long-lived task drains the
//! queue into the sink, so a slow or failing backend never holds up a
//! round's join.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::history::HistorySink;
use crate::observability::metrics;
use crate::probe::ProbeResult;

/// Cheap-to-clone handle for queueing results.
#[derive(Debug, Clone)]
pub struct HistoryWriter {
    tx: mpsc::Sender<ProbeResult>,
}

impl HistoryWriter {
    /// Start the drain task. It exits once every handle is dropped and the
    /// queue is empty.
    pub fn spawn(sink: Arc<dyn HistorySink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(drain(sink, rx));
        (Self { tx }, handle)
    }

    /// Queue one result without waiting. A full or closed queue drops the
    /// result and counts it as a history failure.
    pub fn record(&self, result: ProbeResult) {
        let (result, reason) = match self.tx.try_send(result) {
            Ok(()) => return,
            Err(TrySendError::Full(result)) => (result, "queue full"),
            Err(TrySendError::Closed(result)) => (result, "writer stopped"),
        };

        metrics::record_history_failure();
        tracing::error!(url = %result.target, reason, "Dropping probe result");
    }
}

async fn drain(sink: Arc<dyn HistorySink>, mut rx: mpsc::Receiver<ProbeResult>) {
    while let Some(result) = rx.recv().await {
        let sink = sink.clone();
        let target = result.target.clone();
        let appended = tokio::task::spawn_blocking(move || sink.append(&result)).await;

        let error = match appended {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };

        metrics::record_history_failure();
        tracing::error!(url = %target, error = %error, "Failed to record probe result");
    }

    tracing::debug!("History writer stopped");
}
