//! HTTP client creation and configuration utilities

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use std::time::Duration;

use crate::constants::{HTTP_POOL_MAX_IDLE_PER_HOST, provider};

/// Creates a configured HTTP client with connection pooling and timeout handling.
///
/// The stats provider drops requests that do not look like they come from a
/// browser, so a user agent, referer and JSON accept header are always sent.
///
/// # Features
/// * Configurable timeout for requests (default: 30 seconds, configurable via config/env)
/// * Connection pooling with centralized pool size configuration
/// * Automatic retry logic for transient failures (implemented in fetch function)
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(REFERER, HeaderValue::from_static(provider::REFERER));

    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(provider::USER_AGENT)
        .default_headers(headers)
        .build()
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
