//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the health monitor.
///
/// `targets` has no default: a config file without a target list is
/// rejected at parse time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Endpoints to probe, in the order they appear in snapshots.
    pub targets: Vec<String>,

    /// Round timing and publish policy.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Probe client settings.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Query API listener.
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Cross-origin settings for the dashboard.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Probe history storage.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl MonitorConfig {
    /// Build a config for the given targets with every section defaulted.
    pub fn with_targets(targets: Vec<String>) -> Self {
        Self {
            targets,
            scheduler: SchedulerConfig::default(),
            probe: ProbeConfig::default(),
            listener: ListenerConfig::default(),
            cors: CorsConfig::default(),
            history: HistoryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between round starts.
    pub interval_secs: u64,

    /// Per-probe timeout in milliseconds.
    pub probe_timeout_ms: u64,

    /// What to do when overlapping rounds finish out of order.
    pub publish_policy: PublishPolicy,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            probe_timeout_ms: 500,
            publish_policy: PublishPolicy::default(),
        }
    }
}

/// Publish ordering between overlapping rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishPolicy {
    /// Whichever round finishes last is visible, even if it started first.
    #[default]
    LastWriterWins,
    /// A round is published only if it started after the visible one.
    Monotonic,
}

/// Probe client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// User-Agent header sent with every probe.
    pub user_agent: String,

    /// Follow redirects; the final response status decides reachability.
    pub follow_redirects: bool,

    /// Honor HTTP(S)_PROXY / NO_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("server-health-monitor/", env!("CARGO_PKG_VERSION")).to_string(),
            follow_redirects: true,
            use_system_proxy: true,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout for API calls in seconds.
    pub request_timeout_secs: u64,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Where probe results are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// Process-local, bounded per target, lost on restart.
    Memory,
    /// Append-only JSON Lines file.
    #[default]
    File,
}

/// History configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,

    /// File path for the `file` backend.
    pub path: String,

    /// Results kept per target by the `memory` backend; older ones are dropped.
    pub memory_capacity: usize,

    /// Results that may wait for the history writer before new ones are dropped.
    pub queue_capacity: usize,

    /// Maximum results returned per history query (0 = unlimited).
    pub max_results: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::File,
            path: "probe_history.jsonl".to_string(),
            memory_capacity: 1000,
            queue_capacity: 4096,
            max_results: 0,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
