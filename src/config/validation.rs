//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every target is an absolute http(s) URL, listed once
//! - Validate value ranges (interval in (0, one week], timeout > 0, capacities > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - An empty target list is valid; rounds then publish empty snapshots

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::{HistoryBackend, MonitorConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target {target:?} is not a valid URL: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("target {target:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme { target: String, scheme: String },

    #[error("target {0:?} is listed more than once")]
    DuplicateTarget(String),

    #[error("scheduler.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("scheduler.probe_timeout_ms must be greater than zero")]
    ZeroProbeTimeout,

    #[error("scheduler.interval_secs must be at most {max}, got {value}")]
    IntervalTooLong { value: u64, max: u64 },

    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("history.path must be set for the file backend")]
    MissingHistoryPath,

    #[error("cors origin {0:?} is not a valid header value")]
    InvalidCorsOrigin(String),
}

/// Longest accepted round interval: one week.
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for target in &config.targets {
        if let Err(e) = validate_target(target) {
            errors.push(e);
        }
        if !seen.insert(target.as_str()) {
            errors.push(ValidationError::DuplicateTarget(target.clone()));
        }
    }

    if config.scheduler.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    } else if config.scheduler.interval_secs > MAX_INTERVAL_SECS {
        errors.push(ValidationError::IntervalTooLong {
            value: config.scheduler.interval_secs,
            max: MAX_INTERVAL_SECS,
        });
    }
    if config.scheduler.probe_timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.history.backend == HistoryBackend::File && config.history.path.trim().is_empty() {
        errors.push(ValidationError::MissingHistoryPath);
    }
    if config.history.memory_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity("history.memory_capacity"));
    }
    if config.history.queue_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity("history.queue_capacity"));
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidCorsOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_target(target: &str) -> Result<(), ValidationError> {
    let url = Url::parse(target).map_err(|e| ValidationError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                target: target.to_string(),
                scheme: other.to_string(),
            })
        }
    }

    if url.host_str().is_none() {
        return Err(ValidationError::InvalidTarget {
            target: target.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::MonitorConfig;

    fn config(targets: &[&str]) -> MonitorConfig {
        MonitorConfig::with_targets(targets.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_accepts_http_and_https_targets() {
        let cfg = config(&["http://ok.test", "https://a.test/health"]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_empty_target_list_is_valid() {
        assert!(validate_config(&config(&[])).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut cfg = config(&["ftp://files.test", "not a url", "http://a.test", "http://a.test"]);
        cfg.scheduler.interval_secs = 0;
        cfg.scheduler.probe_timeout_ms = 0;

        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::UnsupportedScheme { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidTarget { .. }));
        assert_eq!(errors[2], ValidationError::DuplicateTarget("http://a.test".into()));
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::ZeroProbeTimeout));
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut cfg = config(&["http://a.test"]);
        cfg.listener.bind_address = "localhost".into();
        let errors = validate_config(&cfg).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidAddress { field: "listener.bind_address", .. }
        ));
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut cfg = config(&["http://a.test"]);
        cfg.history.backend = HistoryBackend::File;
        cfg.history.path = "  ".into();
        assert_eq!(
            validate_config(&cfg).unwrap_err(),
            vec![ValidationError::MissingHistoryPath]
        );
    }

    #[test]
    fn test_rejects_interval_past_upper_bound() {
        let mut cfg = config(&["http://a.test"]);
        cfg.scheduler.interval_secs = u64::MAX;
        assert_eq!(
            validate_config(&cfg).unwrap_err(),
            vec![ValidationError::IntervalTooLong {
                value: u64::MAX,
                max: MAX_INTERVAL_SECS,
            }]
        );

        cfg.scheduler.interval_secs = MAX_INTERVAL_SECS;
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_rejects_zero_capacities() {
        let mut cfg = config(&["http://a.test"]);
        cfg.history.memory_capacity = 0;
        cfg.history.queue_capacity = 0;
        assert_eq!(
            validate_config(&cfg).unwrap_err(),
            vec![
                ValidationError::ZeroCapacity("history.memory_capacity"),
                ValidationError::ZeroCapacity("history.queue_capacity"),
            ]
        );
    }
}
