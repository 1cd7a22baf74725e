//! Identification orchestrator.
//!
//! Decides between a direct identifier lookup and a title search, dispatches
//! one detail worker per candidate URL, and waits for the workers with a
//! cooperative abort flag. Worker failures never surface here; the only
//! search-phase outcomes are the returned error and whatever records the
//! workers pushed into the sink.

mod types;
mod worker;

pub use types::{IdentifyError, IdentifyRequest};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::fetcher::PageFetcher;
use crate::metadata::{MetadataCleaner, MetadataRecord, BEAM_EBOOKS_SCHEME};
use crate::search::{build_search_query, resolve_candidates};

/// Run one identification attempt.
///
/// Records appear in `sink` as workers finish; completion order is
/// unspecified and `source_relevance` is the only ordering signal. Setting
/// `abort` stops the wait loop on its next pass without tearing down
/// in-flight workers.
pub async fn identify(
    request: &IdentifyRequest,
    fetcher: Arc<dyn PageFetcher>,
    sink: UnboundedSender<MetadataRecord>,
    abort: Arc<AtomicBool>,
    cleaner: Arc<dyn MetadataCleaner>,
    config: &SourceConfig,
) -> Result<(), IdentifyError> {
    let candidates = gather_candidates(request, &fetcher, config).await?;
    info!(candidates = candidates.len(), "Identification candidates resolved");

    if abort.load(Ordering::Relaxed) {
        info!("Abort observed before dispatch, skipping workers");
        return Ok(());
    }

    let handles = dispatch_workers(candidates, &fetcher, &sink, &cleaner, config).await;
    wait_for_workers(handles, &abort, config).await;

    Ok(())
}

/// Resolve the list of candidate detail URLs.
///
/// A known `beam-ebooks` identifier short-circuits the search entirely.
async fn gather_candidates(
    request: &IdentifyRequest,
    fetcher: &Arc<dyn PageFetcher>,
    config: &SourceConfig,
) -> Result<Vec<String>, IdentifyError> {
    let base = config.base_url.trim_end_matches('/');

    if let Some(id) = request.identifiers.get(BEAM_EBOOKS_SCHEME) {
        let url = format!("{}/ebook/{}", base, id);
        info!(url = %url, "Direct identifier lookup, no search needed");
        return Ok(vec![url]);
    }

    let query = build_search_query(base, request.title.as_deref(), &request.authors)
        .ok_or(IdentifyError::InsufficientMetadata)?;

    info!(url = %query.url, "Fetching search results");
    let bytes = fetcher.fetch(&query.url).await?;
    let body = String::from_utf8_lossy(&bytes);

    Ok(resolve_candidates(&body, base))
}

/// Spawn one worker per candidate, rank equal to list position, with a
/// fixed delay between starts so the remote site is not hammered.
async fn dispatch_workers(
    candidates: Vec<String>,
    fetcher: &Arc<dyn PageFetcher>,
    sink: &UnboundedSender<MetadataRecord>,
    cleaner: &Arc<dyn MetadataCleaner>,
    config: &SourceConfig,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::with_capacity(candidates.len());

    for (relevance, url) in candidates.into_iter().enumerate() {
        if relevance > 0 {
            tokio::time::sleep(Duration::from_millis(config.dispatch_delay_ms)).await;
        }

        debug!(url = %url, relevance = relevance, "Dispatching detail worker");
        let worker_fetcher = fetcher.fork();
        let worker_sink = sink.clone();
        let worker_cleaner = Arc::clone(cleaner);
        handles.push(tokio::spawn(worker::run_worker(
            url,
            worker_fetcher,
            worker_sink,
            relevance,
            worker_cleaner,
        )));
    }

    handles
}

/// Poll workers until all finish or the abort flag is observed.
///
/// Abort stops the waiting only; running workers finish in the background
/// and their late output is simply no longer awaited.
async fn wait_for_workers(
    mut handles: Vec<JoinHandle<()>>,
    abort: &Arc<AtomicBool>,
    config: &SourceConfig,
) {
    loop {
        if abort.load(Ordering::Relaxed) {
            info!(remaining = handles.len(), "Abort observed, leaving workers behind");
            return;
        }

        handles.retain(|handle| !handle.is_finished());
        if handles.is_empty() {
            debug!("All detail workers finished");
            return;
        }

        tokio::time::sleep(Duration::from_millis(config.worker_poll_interval_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::metadata::NoopCleaner;
    use crate::testing::MockFetcher;
    use std::collections::HashMap;
    use std::time::Instant;
    use tokio::sync::mpsc;

    const BASE: &str = "http://www.beam-ebooks.de";

    const DETAIL_BODY: &str = r#"
        <html><body><table><tr><td>
          <h2>Die ersten Tage in Chanda - Perry Rhodan 2601</h2>
          <a href="/autoreninfo.php?id=77">Christian Montillon</a>
        </td></tr></table></body></html>
    "#;

    fn quick_config() -> SourceConfig {
        SourceConfig {
            dispatch_delay_ms: 1,
            worker_poll_interval_ms: 5,
            ..SourceConfig::default()
        }
    }

    fn request_with_identifier(id: &str) -> IdentifyRequest {
        let mut identifiers = HashMap::new();
        identifiers.insert(BEAM_EBOOKS_SCHEME.to_string(), id.to_string());
        IdentifyRequest {
            identifiers,
            ..IdentifyRequest::default()
        }
    }

    fn harness() -> (
        Arc<AtomicBool>,
        Arc<dyn MetadataCleaner>,
    ) {
        (Arc::new(AtomicBool::new(false)), Arc::new(NoopCleaner))
    }

    #[tokio::test]
    async fn test_direct_identifier_skips_search() {
        let fetcher = MockFetcher::new();
        fetcher
            .set_body("http://www.beam-ebooks.de/ebook/12748", DETAIL_BODY)
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        identify(
            &request_with_identifier("12748"),
            Arc::new(fetcher.clone()),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap();

        // Only the detail URL was fetched; no search round-trip happened.
        let fetches = fetcher.recorded_fetches().await;
        assert_eq!(fetches, vec!["http://www.beam-ebooks.de/ebook/12748"]);

        let record = rx.try_recv().unwrap();
        assert_eq!(record.beam_ebooks_id.as_deref(), Some("12748"));
        assert_eq!(record.source_relevance, 0);
    }

    #[tokio::test]
    async fn test_search_path_end_to_end() {
        let fetcher = MockFetcher::new();
        fetcher
            .set_body(
                "http://www.beam-ebooks.de/suchergebnis.php5?Type=Title&SearchString=Das%20Thanatos-Programm",
                r#"<html><body><table><tr>
                     <td><a href="/ebook/12700">Treffer</a></td>
                   </tr></table></body></html>"#,
            )
            .await;
        fetcher
            .set_body("http://www.beam-ebooks.de/ebook/12700", DETAIL_BODY)
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        let request = IdentifyRequest {
            title: Some("PR2600 - Das Thanatos-Programm".to_string()),
            ..IdentifyRequest::default()
        };

        identify(
            &request,
            Arc::new(fetcher.clone()),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap();

        let record = rx.try_recv().unwrap();
        assert_eq!(record.beam_ebooks_id.as_deref(), Some("12700"));
        assert_eq!(record.series.as_deref(), Some("Neuroversum"));

        // Detail workers run on forked clients, never the shared one.
        assert_eq!(fetcher.fork_count(), 1);
    }

    #[tokio::test]
    async fn test_no_title_no_identifier_is_insufficient() {
        let fetcher = MockFetcher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        let request = IdentifyRequest {
            authors: vec!["Uwe Anton".to_string()],
            ..IdentifyRequest::default()
        };

        let err = identify(
            &request,
            Arc::new(fetcher),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IdentifyError::InsufficientMetadata));
    }

    #[tokio::test]
    async fn test_search_fetch_failure_aborts_attempt() {
        let fetcher = MockFetcher::new();
        fetcher
            .set_error(
                "http://www.beam-ebooks.de/suchergebnis.php5?Type=Title&SearchString=Der%20Schwarm",
                FetchError::ConnectionFailed("refused".to_string()),
            )
            .await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        let request = IdentifyRequest {
            title: Some("Der Schwarm".to_string()),
            ..IdentifyRequest::default()
        };

        let err = identify(
            &request,
            Arc::new(fetcher),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IdentifyError::Search(_)));
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_still_reaches_done() {
        let fetcher = MockFetcher::new();
        let url = "http://www.beam-ebooks.de/ebook/404404";
        fetcher
            .set_error(url, FetchError::NotFound(url.to_string()))
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        identify(
            &request_with_identifier("404404"),
            Arc::new(fetcher),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_assigns_ranks_in_order() {
        let fetcher = MockFetcher::new();
        let urls: Vec<String> = (0..3)
            .map(|i| format!("http://www.beam-ebooks.de/ebook/{}", 100 + i))
            .collect();
        for url in &urls {
            fetcher.set_body(url, DETAIL_BODY).await;
        }
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_, cleaner) = harness();
        let config = quick_config();

        let fetcher: Arc<dyn PageFetcher> = Arc::new(fetcher);
        let handles = dispatch_workers(urls, &fetcher, &tx, &cleaner, &config).await;
        assert_eq!(handles.len(), 3);
        for handle in handles {
            handle.await.unwrap();
        }
        drop(tx);

        let mut ranks = Vec::new();
        while let Some(record) = rx.recv().await {
            ranks.push(record.source_relevance);
        }
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_abort_before_dispatch_skips_everything() {
        let fetcher = MockFetcher::new();
        fetcher
            .set_body("http://www.beam-ebooks.de/ebook/12748", DETAIL_BODY)
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();
        abort.store(true, Ordering::Relaxed);

        identify(
            &request_with_identifier("12748"),
            Arc::new(fetcher.clone()),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap();

        assert!(rx.try_recv().is_err());
        assert!(fetcher.recorded_fetches().await.is_empty());
    }

    #[tokio::test]
    async fn test_abort_mid_wait_stops_polling() {
        let fetcher = MockFetcher::new();
        fetcher
            .set_body("http://www.beam-ebooks.de/ebook/12748", DETAIL_BODY)
            .await;
        // Keep the worker busy long enough for the abort to land mid-wait.
        fetcher.set_delay(Duration::from_millis(1500)).await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let (abort, cleaner) = harness();

        let abort_setter = Arc::clone(&abort);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            abort_setter.store(true, Ordering::Relaxed);
        });

        let started = Instant::now();
        identify(
            &request_with_identifier("12748"),
            Arc::new(fetcher),
            tx,
            abort,
            cleaner,
            &quick_config(),
        )
        .await
        .unwrap();

        // Returned on a polling pass after the flag was set, well before the
        // in-flight worker could have finished.
        assert!(started.elapsed() < Duration::from_millis(1000));
    }
}
