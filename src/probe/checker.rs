//! Single-target HTTP probe.
//!
//! # Responsibilities
//! - Issue exactly one GET against a target, bounded by a timeout
//! - Drain and drop the response body on every path
//! - Normalize every failure into an unreachable `ProbeResult`

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use reqwest::Client;
use tokio::time;

use crate::config::ProbeConfig;
use crate::observability::metrics;
use crate::probe::types::{clamp_latency, ProbeFailure, ProbeResult};

/// Something that can check one target within a timeout.
///
/// Implementations never fail: every problem is folded into an unreachable
/// `ProbeResult` whose latency does not exceed `timeout`.
pub trait Probe: Send + Sync + 'static {
    fn check(&self, target: &str, timeout: Duration) -> impl Future<Output = ProbeResult> + Send;
}

/// Performs bounded-timeout probes. Cheap to share behind an `Arc`; the
/// underlying client pools connections across rounds.
#[derive(Debug, Clone)]
pub struct Checker {
    client: Client,
}

impl Checker {
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let redirect = if config.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn attempt(
        &self,
        target: &str,
        timeout: Duration,
        started: Instant,
    ) -> Result<Duration, ProbeFailure> {
        let request = self
            .client
            .get(target)
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeFailure::InvalidRequest(e.to_string()))?;

        let mut response = self.client.execute(request).await?;
        let latency = started.elapsed();
        let status = response.status();

        // Release the connection before deciding the outcome.
        while response.chunk().await?.is_some() {}

        if !status.is_success() {
            return Err(ProbeFailure::Status(status.as_u16()));
        }

        Ok(latency)
    }
}

impl Probe for Checker {
    /// Probe `target`, never taking longer than `timeout`.
    ///
    /// Latency on success is time to response headers. On failure it is the
    /// time until the failure was observed, capped at `timeout`.
    async fn check(&self, target: &str, timeout: Duration) -> ProbeResult {
        let started = Instant::now();

        let outcome = match time::timeout(timeout, self.attempt(target, timeout, started)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeFailure::Timeout),
        };

        let result = match outcome {
            Ok(latency) => {
                tracing::debug!(url = %target, latency = ?latency, "Probe succeeded");
                ProbeResult::new(target, clamp_latency(latency, timeout), true)
            }
            Err(failure) => {
                let latency = clamp_latency(started.elapsed(), timeout);
                tracing::warn!(
                    url = %target,
                    kind = failure.kind(),
                    latency = ?latency,
                    "Probe failed: {}",
                    failure
                );
                ProbeResult::unreachable(target, latency)
            }
        };

        metrics::record_probe(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                    status_line
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/", addr)
    }

    fn checker() -> Checker {
        Checker::new(&ProbeConfig {
            use_system_proxy: false,
            ..ProbeConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_is_reachable() {
        let url = serve_once("200 OK", Duration::ZERO).await;
        let result = checker().check(&url, Duration::from_secs(2)).await;

        assert!(result.reachable);
        assert_eq!(result.target, url);
        assert!(result.latency < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_server_error_is_unreachable() {
        let url = serve_once("500 Internal Server Error", Duration::ZERO).await;
        let result = checker().check(&url, Duration::from_secs(2)).await;

        assert!(!result.reachable);
    }

    #[tokio::test]
    async fn test_slow_response_is_clamped() {
        let timeout = Duration::from_millis(200);
        let url = serve_once("200 OK", Duration::from_secs(2)).await;

        let started = Instant::now();
        let result = checker().check(&url, timeout).await;

        assert!(!result.reachable);
        assert!(result.latency <= timeout);
        assert!(result.latency >= Duration::from_millis(150));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_unreachable() {
        let timeout = Duration::from_millis(500);
        let result = checker().check("not a url", timeout).await;

        assert!(!result.reachable);
        assert!(result.latency <= timeout);
        assert_eq!(result.target, "not a url");
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let timeout = Duration::from_millis(500);
        let result = checker().check(&format!("http://{}/", addr), timeout).await;

        assert!(!result.reachable);
        assert!(result.latency <= timeout);
    }
}
