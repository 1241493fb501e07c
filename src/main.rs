//! Server Health Monitor
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        HEALTH MONITOR                            │
//!   │                                                                  │
//!   │  ┌───────────┐  tick   ┌────────────┐  N tasks  ┌───────────┐   │
//!   │  │ scheduler │────────▶│ aggregator │──────────▶│  checker  │───┼──▶ Targets
//!   │  └───────────┘         └─────┬──────┘           └─────┬─────┘   │
//!   │                              │ join all               │ each    │
//!   │                              ▼                        ▼ result  │
//!   │                       ┌────────────┐           ┌───────────┐    │
//!   │                       │  snapshot  │           │  history  │    │
//!   │                       │   store    │           │   sink    │    │
//!   │                       └─────┬──────┘           └─────┬─────┘    │
//!   │                             │ read                   │ query    │
//!   │                             ▼                        ▼          │
//!   │                       ┌─────────────────────────────────┐       │
//!   │   Client ◀────────────│        http (query API)         │       │
//!   │                       └─────────────────────────────────┘       │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use server_health_monitor::config::load_config;
use server_health_monitor::history::{open_sink, HistoryWriter};
use server_health_monitor::lifecycle::{join_task, signals, Shutdown};
use server_health_monitor::observability::{logging, metrics};
use server_health_monitor::{Aggregator, Checker, HttpServer, MonitorService, Scheduler, SnapshotStore};

const HISTORY_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "server-health-monitor")]
#[command(about = "Periodic HTTP health checks with snapshot and history API", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "monitor.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config errors are fatal: nothing is scheduled or served.
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!("server-health-monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %args.config.display(),
        targets = config.targets.len(),
        interval_secs = config.scheduler.interval_secs,
        probe_timeout_ms = config.scheduler.probe_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let history = open_sink(&config.history)?;
    let checker = Checker::new(&config.probe)?;
    let store = Arc::new(SnapshotStore::new(config.scheduler.publish_policy));
    let (history_writer, writer_task) =
        HistoryWriter::spawn(history.clone(), config.history.queue_capacity);
    let aggregator = Arc::new(Aggregator::new(checker, history_writer));

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let scheduler = Scheduler::new(
        aggregator,
        store.clone(),
        config.targets.clone(),
        &config.scheduler,
    );
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let service = MonitorService::new(store, history, config.history.max_results);
    let server = HttpServer::new(config, service);
    server.serve(shutdown.subscribe()).await?;

    join_task("scheduler", scheduler_task).await;

    // Rounds still in flight keep the writer open; give queued results a
    // bounded window to land.
    match tokio::time::timeout(HISTORY_DRAIN_TIMEOUT, writer_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "History writer task failed"),
        Err(_) => tracing::warn!("History writer still busy at shutdown, abandoning queue"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
