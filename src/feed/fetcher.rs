use crate::feed::FeedError;
use futures::StreamExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::future::Future;

/// Default cap on a feed response body (10MB).
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Some feed origins reject requests that do not look like a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
pub const FEED_ACCEPT: &str = "application/rss+xml,application/xml;q=0.9,*/*;q=0.8";
pub const FEED_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Retrieves raw feed bytes for a resolved URL.
pub trait FetchFeed: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FeedError>> + Send;
}

/// [`FetchFeed`] over HTTP.
///
/// One GET per call with the browser-like header set. No retries, no
/// caching and no timeout beyond the client's own defaults.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    /// # Arguments
    ///
    /// * `client` - HTTP client (allows custom configuration)
    /// * `max_bytes` - Largest response body accepted before failing
    pub fn new(client: reqwest::Client, max_bytes: usize) -> Self {
        Self { client, max_bytes }
    }
}

impl FetchFeed for HttpFetcher {
    /// # Errors
    ///
    /// - [`FeedError::Transport`] - Connection, DNS or TLS failure, a broken
    ///   body stream, or a body larger than `max_bytes`
    /// - [`FeedError::HttpStatus`] - Any status other than 200 (body discarded)
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, FEED_ACCEPT)
            .header(ACCEPT_LANGUAGE, FEED_ACCEPT_LANGUAGE)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(url = %url, status = %status, "Feed origin returned non-200 status");
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        read_limited_bytes(response, self.max_bytes).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FeedError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(too_large(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(too_large(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    // EDGE-005: Connection dropped mid-body
    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FeedError::Transport(format!(
                "incomplete response: expected {} bytes, received {}",
                expected,
                bytes.len()
            )));
        }
    }

    Ok(bytes)
}

fn too_large(limit: usize) -> FeedError {
    FeedError::Transport(format!("response body exceeds {} bytes", limit))
}
