pub mod catalog;
pub mod marketplace;

pub use catalog::{name_filter, CatalogClient, BULK_PAGE_SIZE, SEARCH_PAGE_SIZE};
pub use marketplace::MarketplaceClient;

use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

use crate::config::Upstream;
use crate::error::UpstreamError;

/// Shared HTTP client. Every upstream call gets the configured timeout.
pub fn http_client(upstream: &Upstream) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(upstream.timeout()).build()
}

/// Bounded retry for idempotent GETs only.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(upstream: &Upstream) -> Self {
        Self {
            max_retries: upstream.max_retries,
            backoff: Duration::from_millis(upstream.retry_backoff_ms),
        }
    }

    pub async fn run<T, F, Fut>(
        &self,
        upstream: &'static str,
        mut attempt: F,
    ) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    // 1x, 2x, 4x ... the base backoff
                    let delay = self.backoff.saturating_mul(2u32.saturating_pow(retries));
                    retries += 1;
                    tracing::warn!(
                        upstream,
                        retry = retries,
                        ?delay,
                        error = %e,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

/// Send a request, require a 2xx and decode the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    upstream: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(upstream, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status { upstream, status });
    }

    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(upstream, e))?;

    serde_json::from_str(&body).map_err(|source| UpstreamError::Malformed { upstream, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::from_millis(1),
        }
    }

    fn server_error() -> UpstreamError {
        UpstreamError::Status {
            upstream: "test",
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = policy(0)
            .run("test", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(server_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = &AtomicU32::new(0);
        let result = policy(3)
            .run("test", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = policy(3)
            .run("test", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(UpstreamError::Status {
                    upstream: "test",
                    status: reqwest::StatusCode::FORBIDDEN,
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = policy(2)
            .run("test", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(server_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
