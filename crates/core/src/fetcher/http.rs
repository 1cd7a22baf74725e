//! Reqwest-backed page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::SourceConfig;

use super::{FetchError, PageFetcher};

/// HTTP page fetcher with its own cookie jar.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new fetcher from the source configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        let client = Self::build_client(timeout)?;
        Ok(Self { client, timeout })
    }

    fn build_client(timeout: Duration) -> Result<Client, FetchError> {
        Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Internal(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url = url, "Fetching page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_connect() {
                FetchError::ConnectionFailed(e.to_string())
            } else {
                FetchError::Internal(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Internal(e.to_string()))?;

        debug!(url = url, bytes = body.len(), "Fetched page");
        Ok(body.to_vec())
    }

    fn fork(&self) -> Arc<dyn PageFetcher> {
        // Fresh client, fresh cookie jar. The builder only fails on TLS
        // backend initialization, which already succeeded once in new().
        let client =
            Self::build_client(self.timeout).expect("Failed to create HTTP client");
        Arc::new(Self {
            client,
            timeout: self.timeout,
        })
    }
}
