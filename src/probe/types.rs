//! Probe result and failure types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one probe against one target.
///
/// Serialized with the field names the dashboard expects; `latency` is an
/// integer number of nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "server_url")]
    pub target: String,

    /// When the probe finished (RFC 3339 on the wire).
    pub timestamp: DateTime<Utc>,

    #[serde(with = "latency_nanos")]
    pub latency: Duration,

    #[serde(rename = "is_up")]
    pub reachable: bool,
}

impl ProbeResult {
    /// Build a result stamped with the current time.
    pub fn new(target: impl Into<String>, latency: Duration, reachable: bool) -> Self {
        Self {
            target: target.into(),
            timestamp: Utc::now(),
            latency,
            reachable,
        }
    }

    /// Build an unreachable result for a probe that never reported back.
    pub fn unreachable(target: impl Into<String>, latency: Duration) -> Self {
        Self::new(target, latency, false)
    }
}

/// Every way a single probe can fail.
///
/// Failures never leave the checker as errors: they are logged and
/// recorded as `reachable = false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("could not build request: {0}")]
    InvalidRequest(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("timed out")]
    Timeout,

    #[error("non-success status {0}")]
    Status(u16),

    #[error("failed reading response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("probe task aborted: {0}")]
    Aborted(String),
}

impl ProbeFailure {
    /// Short label used in metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeFailure::InvalidRequest(_) => "invalid_request",
            ProbeFailure::Connect(_) => "connect",
            ProbeFailure::Timeout => "timeout",
            ProbeFailure::Status(_) => "status",
            ProbeFailure::Body(_) => "body",
            ProbeFailure::Transport(_) => "transport",
            ProbeFailure::Aborted(_) => "aborted",
        }
    }
}

impl From<reqwest::Error> for ProbeFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeFailure::Timeout
        } else if e.is_builder() {
            ProbeFailure::InvalidRequest(e.to_string())
        } else if e.is_connect() {
            ProbeFailure::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            ProbeFailure::Body(e.to_string())
        } else {
            ProbeFailure::Transport(e.to_string())
        }
    }
}

/// Clamp a measured latency into `[0, timeout]`.
pub fn clamp_latency(elapsed: Duration, timeout: Duration) -> Duration {
    elapsed.min(timeout)
}

mod latency_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
