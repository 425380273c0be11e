//! Generic HTTP fetching utilities with retry logic and error handling

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::retry::BASE_DELAY_MS;
use crate::data_fetcher::models::StatsResponse;
use crate::error::AppError;

/// Generic fetch function with retry logic and status-code specific errors.
///
/// - Retries 429, 5xx, timeouts and connection failures with exponential backoff
/// - Respects Retry-After headers for rate limiting
/// - Maps the final failure to a specific `AppError` variant
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch data from
/// * `max_retries` - retries after the first attempt; 0 disables retrying
#[instrument(skip(client))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    max_retries: u32,
) -> Result<T, AppError> {
    info!("Fetching data from URL: {url}");

    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(BASE_DELAY_MS);
    let response = loop {
        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if (status.as_u16() == 429 || status.is_server_error()) && attempt < max_retries {
                    // Respect Retry-After if provided
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(Duration::from_secs);
                    let wait = retry_after.unwrap_or(backoff);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        wait,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                break resp;
            }
            Err(e) => {
                if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                    warn!(
                        "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                        e,
                        url,
                        backoff,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                error!("Request failed for URL {}: {}", url, e);
                return if e.is_timeout() {
                    Err(AppError::network_timeout(url))
                } else if e.is_connect() {
                    Err(AppError::network_connection(url, e.to_string()))
                } else {
                    Err(AppError::ApiFetch(e))
                };
            }
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{')
                && !response_text.trim_start().starts_with('[')
            {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}

/// Fetches a provider response and decodes the named result set into rows.
/// An empty result set is a valid, empty answer.
pub(super) async fn fetch_result_set<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    result_set: &str,
    max_retries: u32,
) -> Result<Vec<T>, AppError> {
    let response: StatsResponse = fetch(client, url, max_retries).await?;

    let set = response
        .result_set(result_set)
        .ok_or_else(|| AppError::api_result_set_missing(result_set, url))?;

    let rows = set.decode_rows::<T>().map_err(|e| {
        error!("Result set {result_set} from {url} did not match the expected columns: {e}");
        AppError::api_unexpected_structure(e.to_string(), url)
    })?;

    debug!("Decoded {} rows from result set {}", rows.len(), result_set);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::data_fetcher::models::ResultSet;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(rename = "ID")]
        id: i64,
    }

    fn response_with(name: &str) -> StatsResponse {
        StatsResponse::new(vec![ResultSet::new(
            name,
            &["ID"],
            vec![vec![json!(1)], vec![json!(2)]],
        )])
    }

    #[tokio::test]
    async fn test_fetch_result_set_success() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .and(path("/things"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_with("Things")))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let rows: Vec<Row> = fetch_result_set(&client, &url, "Things", 0).await.unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_result_set_missing_set() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_with("Other")))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch_result_set::<Row>(&client, &url, "Things", 0).await;

        assert!(matches!(
            result,
            Err(AppError::ApiResultSetMissing { ref name, .. }) if name == "Things"
        ));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch::<StatsResponse>(&client, &url, 0).await;

        assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_server_error_without_retries() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch::<StatsResponse>(&client, &url, 0).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::ApiServerError { status: 500, .. }));
        assert!(err.is_remote_unavailable());
    }

    #[tokio::test]
    async fn test_fetch_sends_one_request_plus_retries() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let err = fetch::<StatsResponse>(&client, &url, 2).await.unwrap_err();

        assert!(matches!(err, AppError::ApiServerError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_retries_transient_failure() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_with("Things")))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let rows: Vec<Row> = fetch_result_set(&client, &url, "Things", 1).await.unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_malformed_json() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch::<StatsResponse>(&client, &url, 0).await;

        assert!(matches!(result, Err(AppError::ApiMalformedJson { .. })));
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch::<StatsResponse>(&client, &url, 0).await;

        assert!(matches!(result, Err(AppError::ApiNoData { .. })));
    }

    #[tokio::test]
    async fn test_fetch_wrong_columns_is_unexpected_structure() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        let body = StatsResponse::new(vec![ResultSet::new(
            "Things",
            &["NOT_ID"],
            vec![vec![json!(1)]],
        )]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let url = format!("{}/things", mock_server.uri());
        let result = fetch_result_set::<Row>(&client, &url, "Things", 0).await;

        assert!(matches!(result, Err(AppError::ApiUnexpectedStructure { .. })));
    }
}
