use crate::config::SourceConfig;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Failure of a single GET attempt.
#[derive(Error, Debug)]
enum AttemptError {
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl AttemptError {
    /// Rate limits, server errors and transport failures are retried;
    /// any other 4xx is final.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status(s) => *s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error(),
            Self::Request(_) => true,
        }
    }
}

/// Delays between attempts: 2, 4, 8… times `base_ms`, jittered, capped at 30s.
fn backoff(base_ms: u64, retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(base_ms)
        .max_delay(Duration::from_secs(30))
        .map(jitter)
        .take(retries)
}

pub struct HttpClient {
    inner: reqwest::Client,
    retry_base_ms: u64,
    max_retries: usize,
}

impl HttpClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Google redirects published sheets through a cookie-setting hop
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner,
            retry_base_ms: config.retry_base_ms,
            max_retries: config.max_retries,
        })
    }

    async fn attempt(&self, url: &str) -> std::result::Result<String, AttemptError> {
        debug!("GET {}", url);
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(AttemptError::Status(status));
        }
        Ok(resp.text().await?)
    }

    /// Fetch a URL as text, retrying transient failures.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        RetryIf::spawn(
            backoff(self.retry_base_ms, self.max_retries),
            || self.attempt(url),
            |e: &AttemptError| e.is_retryable(),
        )
        .await
        .with_context(|| format!("Failed to fetch {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(AttemptError::Status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(AttemptError::Status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!AttemptError::Status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!AttemptError::Status(StatusCode::FORBIDDEN).is_retryable());
    }

    #[test]
    fn test_backoff_is_bounded() {
        let delays: Vec<Duration> = backoff(500, 3).collect();
        assert_eq!(delays.len(), 3);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(30)));
    }
}
