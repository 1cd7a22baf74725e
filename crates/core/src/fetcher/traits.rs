//! Fetcher trait and error types.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while fetching a page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The server reported the page as missing (HTTP 404).
    #[error("page not found: {0}")]
    NotFound(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Internal client error.
    #[error("internal fetch error: {0}")]
    Internal(String),
}

/// Trait for page fetching backends.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a URL and return the raw response body.
    ///
    /// The body is returned as bytes; the site does not serve UTF-8 and
    /// decoding is the caller's concern.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Create an independent instance of this fetcher.
    ///
    /// Concurrent workers must not share connection or cookie state, so each
    /// worker is handed its own fork at dispatch time.
    fn fork(&self) -> Arc<dyn PageFetcher>;
}
