use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;

use super::parser::{parse_feed, ParsedEntry};
use super::sources::FeedSource;

const MAX_RETRIES: u32 = 3;
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_CONCURRENT_FETCHES: usize = 10;
const USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a single feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Received fewer bytes than Content-Length announced
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Outcome of fetching one source.
#[derive(Debug)]
pub struct FetchResult {
    pub source: FeedSource,
    pub result: Result<Vec<ParsedEntry>, FetchError>,
}

/// HTTP client configured for feed fetching.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Fetch every source concurrently.
///
/// # Arguments
///
/// * `client` - HTTP client from [`build_client`]
/// * `sources` - Feeds to fetch
/// * `entries_per_feed` - Only the first N entries of each feed are kept
///
/// # Returns
///
/// One [`FetchResult`] per source, in the same order as `sources`, so
/// downstream ranking is deterministic for identical feed contents.
///
/// # Behavior
///
/// - Fetches up to 10 sources simultaneously
/// - A failing source is logged and reported in its [`FetchResult`]; it never
///   aborts the others
/// - Each source goes through [`fetch_source`] with its retry and size limits
pub async fn fetch_all(
    client: &reqwest::Client,
    sources: &[FeedSource],
    entries_per_feed: usize,
) -> Vec<FetchResult> {
    stream::iter(sources.iter().cloned())
        .map(|source| async move {
            tracing::info!(source = %source.name, "Fetching feed");
            let result = fetch_source(client, &source, entries_per_feed).await;
            match &result {
                Ok(entries) => {
                    tracing::debug!(source = %source.name, entries = entries.len(), "Fetched feed")
                }
                Err(e) => {
                    tracing::warn!(source = %source.name, url = %source.url, error = %e, "Failed to fetch feed")
                }
            }
            FetchResult { source, result }
        })
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await
}

/// Fetch and parse a single source.
///
/// # Arguments
///
/// * `client` - HTTP client for the request
/// * `source` - The feed to fetch
/// * `entries_per_feed` - Maximum number of entries returned
///
/// # Behavior
///
/// - Rate limiting (429) and server errors (5xx) are retried with exponential
///   backoff (1s, 2s, 4s); other non-2xx statuses fail immediately
/// - A body shorter than its Content-Length is retried the same way
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded 30 seconds
/// - [`FetchError::HttpStatus`] - Non-2xx response, or 5xx after max retries
/// - [`FetchError::RateLimited`] - 429 response after max retries
/// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
/// - [`FetchError::IncompleteResponse`] - Truncated body after max retries
/// - [`FetchError::Parse`] - Invalid RSS/Atom XML
pub async fn fetch_source(
    client: &reqwest::Client,
    source: &FeedSource,
    entries_per_feed: usize,
) -> Result<Vec<ParsedEntry>, FetchError> {
    let mut retry_count = 0;

    let bytes = loop {
        let response = tokio::time::timeout(REQUEST_TIMEOUT, client.get(&source.url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();
        let retryable =
            status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

        if retryable {
            if retry_count >= MAX_RETRIES {
                return Err(if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    FetchError::RateLimited(MAX_RETRIES)
                } else {
                    FetchError::HttpStatus(status.as_u16())
                });
            }

            let delay_secs = 2u64.pow(retry_count);
            tracing::warn!(
                feed = %source.url,
                status = %status,
                retry = retry_count,
                delay_secs = delay_secs,
                "Retryable response, backing off"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            retry_count += 1;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        match read_limited_bytes(response, MAX_FEED_SIZE).await {
            Ok(bytes) => break bytes,
            Err(FetchError::IncompleteResponse { expected, received }) => {
                if retry_count >= MAX_RETRIES {
                    return Err(FetchError::IncompleteResponse { expected, received });
                }
                let delay_secs = 2u64.pow(retry_count);
                tracing::debug!(
                    feed = %source.url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    "Retrying incomplete download"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                retry_count += 1;
                continue;
            }
            Err(e) => return Err(e),
        }
    };

    parse_feed(&bytes, entries_per_feed).map_err(|e| FetchError::Parse(e.to_string()))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
