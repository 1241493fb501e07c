//! Shutdown coordination for the monitor.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that the scheduler loop and the API server
/// subscribe to. Rounds already in flight finish on their own.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a background task and log how it ended. Returns false if it
/// panicked or was cancelled.
pub async fn join_task(name: &'static str, handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => {
            tracing::debug!(task = name, "Task finished");
            true
        }
        Err(e) => {
            tracing::error!(task = name, error = %e, "Task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_is_notified() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.clone().subscribe();

        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_join_task_reports_panics() {
        let clean = tokio::spawn(async {});
        assert!(join_task("clean", clean).await);

        let crashed = tokio::spawn(async {
            panic!("scheduler loop crashed");
        });
        assert!(!join_task("crashed", crashed).await);
    }
}
