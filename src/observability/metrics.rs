//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_probes_total` (counter): probes by target, outcome
//! - `monitor_probe_latency_seconds` (histogram): probe latency per target
//! - `monitor_target_up` (gauge): 1=reachable, 0=unreachable, last probe
//! - `monitor_rounds_total` (counter): completed rounds by published flag
//! - `monitor_round_duration_seconds` (histogram): dispatch to join
//! - `monitor_history_append_failures_total` (counter)
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::probe::ProbeResult;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(result: &ProbeResult) {
    let outcome = if result.reachable { "up" } else { "down" };
    counter!(
        "monitor_probes_total",
        "target" => result.target.clone(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("monitor_probe_latency_seconds", "target" => result.target.clone())
        .record(result.latency.as_secs_f64());
    gauge!("monitor_target_up", "target" => result.target.clone())
        .set(if result.reachable { 1.0 } else { 0.0 });
}

pub fn record_round(duration: Duration, published: bool) {
    counter!("monitor_rounds_total", "published" => published.to_string()).increment(1);
    histogram!("monitor_round_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_history_failure() {
    counter!("monitor_history_append_failures_total").increment(1);
}
