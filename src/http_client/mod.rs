//! Retryable HTTP client construction shared by every REST consumer: chain
//! API clients, the external chain registry, and price fetchers.
//!
//! Every client is bounded by a fixed per-request timeout and injects a
//! stable `User-Agent` header.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};

use crate::config::{HttpRetryConfig, JitterSetting};

/// The `User-Agent` value injected into every outgoing request.
const USER_AGENT_VALUE: &str = concat!("pharos/", env!("CARGO_PKG_VERSION"));

/// Creates the base HTTP client with the fixed per-request timeout and
/// injected headers.
pub fn create_base_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    reqwest::Client::builder().timeout(timeout).default_headers(headers).build()
}

/// Wraps a base HTTP client with retry middleware for transient errors.
///
/// # Parameters:
/// - `config`: Configuration for retry policies
/// - `base_client`: The base HTTP client to use
///
/// # Returns
/// A `ClientWithMiddleware` that includes retry capabilities
pub fn create_retryable_http_client(
    config: &HttpRetryConfig,
    base_client: reqwest::Client,
) -> ClientWithMiddleware {
    let policy_builder = match config.jitter {
        JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
        JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
    };

    let retry_policy = policy_builder
        .base(config.base_for_backoff)
        .retry_bounds(config.initial_backoff_ms, config.max_backoff_secs)
        .build_with_max_retries(config.max_retries);

    ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_client_builds_with_timeout() {
        assert!(create_base_http_client(Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn retryable_client_builds_with_default_policy() {
        let base = create_base_http_client(Duration::from_secs(60)).unwrap();
        let _client = create_retryable_http_client(&HttpRetryConfig::default(), base);
    }
}
