//! Mock page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, PageFetcher};

/// Mock implementation of the [`PageFetcher`] trait.
///
/// Provides controllable behavior for testing:
/// - Canned response bodies keyed by URL
/// - Injectable per-URL fetch errors
/// - A recorded fetch log for assertions
/// - An optional artificial delay to simulate slow pages
///
/// Cloning (and [`fork`](PageFetcher::fork)) shares the underlying state, so
/// assertions on the original instance see fetches made by forked workers.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Configured response bodies.
    bodies: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Configured per-URL errors; checked before bodies.
    errors: Arc<RwLock<HashMap<String, FetchError>>>,
    /// Recorded fetch URLs in call order.
    fetches: Arc<RwLock<Vec<String>>>,
    /// Artificial delay applied to every fetch.
    delay: Arc<RwLock<Option<Duration>>>,
    /// Number of forks handed out.
    forks: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response body for a URL.
    pub async fn set_body(&self, url: &str, body: &str) {
        self.bodies
            .write()
            .await
            .insert(url.to_string(), body.as_bytes().to_vec());
    }

    /// Make fetches of a URL fail with the given error.
    pub async fn set_error(&self, url: &str, error: FetchError) {
        self.errors.write().await.insert(url.to_string(), error);
    }

    /// Delay every fetch by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// URLs fetched so far, in call order, across all forks.
    pub async fn recorded_fetches(&self) -> Vec<String> {
        self.fetches.read().await.clone()
    }

    /// How many forks have been handed out.
    pub fn fork_count(&self) -> usize {
        self.forks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.fetches.write().await.push(url.to_string());

        if let Some(error) = self.errors.read().await.get(url) {
            return Err(error.clone());
        }
        if let Some(body) = self.bodies.read().await.get(url) {
            return Ok(body.clone());
        }
        Err(FetchError::NotFound(url.to_string()))
    }

    fn fork(&self) -> Arc<dyn PageFetcher> {
        self.forks.fetch_add(1, Ordering::Relaxed);
        Arc::new(self.clone())
    }
}
