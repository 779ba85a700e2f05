use crate::feed::parser::parse_feed;
use crate::feed::types::Entry;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while retrieving the upstream feed.
///
/// A fetch is attempted exactly once; none of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Something that can produce the current list of feed entries.
///
/// [`FeedCache`](crate::feed::FeedCache) is generic over this so tests can
/// substitute a scripted source for the network.
pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send;
}

impl<T: FeedSource> FeedSource for std::sync::Arc<T> {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        (**self).fetch()
    }
}

/// Fetches the feed over HTTP from a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFeedSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Overrides the 30-second request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Entry>, FetchError>> + Send {
        fetch_entries_within(&self.client, &self.url, self.timeout)
    }
}

/// Downloads and parses the feed at `url` in a single attempt.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded 30 seconds
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
/// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
/// - [`FetchError::Parse`] - Invalid RSS/Atom XML
pub async fn fetch_entries(client: &reqwest::Client, url: &str) -> Result<Vec<Entry>, FetchError> {
    fetch_entries_within(client, url, FETCH_TIMEOUT).await
}

/// [`fetch_entries`] with a caller-chosen limit on waiting for the response headers.
pub async fn fetch_entries_within(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<Entry>, FetchError> {
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let body = read_body(response, MAX_FEED_SIZE).await?;

    let entries = parse_feed(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

    tracing::debug!(feed = %url, entries = entries.len(), "Fetched feed");

    Ok(entries)
}

/// Streams the response body, giving up once it grows past `limit` bytes.
async fn read_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    let declared = response.content_length();

    // A declared length over the cap is rejected before any body is read
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(FetchError::ResponseTooLarge);
    }

    let mut body = Vec::with_capacity(declared.map_or(0, |len| len as usize));
    let mut chunks = response.bytes_stream();

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if body.len() + chunk.len() > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        body.extend_from_slice(&chunk);
    }

    match declared {
        Some(expected) if (body.len() as u64) < expected => Err(FetchError::IncompleteResponse {
            expected,
            received: body.len(),
        }),
        _ => Ok(body),
    }
}
