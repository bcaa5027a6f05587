/*!
 * Shared retry policy for HTTP providers.
 *
 * Network errors, HTTP 429 and 5xx responses are retried with exponential
 * backoff plus random jitter. Authentication failures and other client errors
 * are returned at once.
 */

use log::{error, warn};
use rand::Rng;
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// Retry settings shared by the HTTP providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    pub backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    pub rate_limit: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
            rate_limit: None,
        }
    }

    /// A policy that sends each request once
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn with_rate_limit(mut self, rate_limit: Option<u32>) -> Self {
        self.rate_limit = rate_limit.filter(|rpm| *rpm > 0);
        self
    }

    /// Delay before retry number `attempt` (zero based), without jitter
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.min(16)).unwrap_or(u64::MAX);
        let backoff_ms = self.backoff_base_ms.saturating_mul(factor);

        // Keep retries spaced by at least one rate limit slot
        let spacing_ms = self.rate_limit.map(|rpm| 60_000 / rpm as u64).unwrap_or(0);

        Duration::from_millis(backoff_ms.max(spacing_ms))
    }

    /// Backoff plus up to 25% random jitter
    fn jittered_backoff(&self, attempt: u32) -> Duration {
        let base = self.backoff(attempt);
        let jitter_ms = (base.as_millis() as u64) / 4;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error or runs out of attempts
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.jittered_backoff(attempt);
                    warn!(
                        "{} request failed: {} - retrying in {}ms (attempt {}/{})",
                        label,
                        e,
                        delay.as_millis(),
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("{} request failed after {} attempt(s): {}", label, attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Map a transport error to a provider error
pub(crate) fn request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() || e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else if e.is_request() {
        ProviderError::ConnectionError(format!("Failed to send request: {}", e))
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Map an HTTP status and body to a provider error
pub(crate) fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        429 => ProviderError::RateLimitExceeded(body),
        code => ProviderError::ApiError {
            status_code: code,
            message: body,
        },
    }
}

/// Turn a non-success response into a provider error, reading its body
pub(crate) async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    status_error(status, body)
}
