//! Detail fetch worker.
//!
//! One worker per candidate URL. A worker either pushes exactly one record
//! into the sink or, on any handled failure, pushes nothing; no failure in
//! here ever reaches the orchestrator or a sibling worker.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

use crate::fetcher::{FetchError, PageFetcher};
use crate::metadata::{MetadataCleaner, MetadataRecord};
use crate::parser::{cycle_for_issue, parse_detail};
use crate::search::DETAIL_PATH_MARKER;

/// Body substring the site serves instead of a proper 404 status.
const NOT_FOUND_MARKER: &str = "wurde nicht gefunden";

static EBOOK_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/ebook/(\d+)").expect("invalid ebook id pattern"));

/// Extract the numeric site identifier from a detail URL.
pub(crate) fn parse_beam_ebooks_id(url: &str) -> Option<String> {
    EBOOK_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Fetch and parse one candidate URL, pushing at most one record.
pub(crate) async fn run_worker(
    url: String,
    fetcher: Arc<dyn PageFetcher>,
    sink: UnboundedSender<MetadataRecord>,
    relevance: usize,
    cleaner: Arc<dyn MetadataCleaner>,
) {
    if !url.contains(DETAIL_PATH_MARKER) {
        debug!(url = %url, "Candidate is not a detail page, skipping");
        return;
    }

    let bytes = match fetcher.fetch(&url).await {
        Ok(bytes) => bytes,
        Err(FetchError::NotFound(_)) => {
            warn!(url = %url, "Detail page not found");
            return;
        }
        Err(FetchError::Timeout) => {
            warn!(url = %url, "beam-ebooks.de did not answer in time, retry later");
            return;
        }
        Err(e) => {
            error!(url = %url, error = %e, "Detail fetch failed");
            return;
        }
    };

    // The site does not serve UTF-8; decode lossily rather than fail.
    let body = String::from_utf8_lossy(&bytes);

    if body.contains(NOT_FOUND_MARKER) {
        warn!(url = %url, "Detail page reports the book as missing");
        return;
    }

    let beam_ebooks_id = parse_beam_ebooks_id(&url);
    if beam_ebooks_id.is_none() {
        error!(url = %url, "Could not extract a beam-ebooks id from the detail URL");
    }

    let detail = parse_detail(&body);

    let issue = detail
        .series_index
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok());
    let series = issue.and_then(cycle_for_issue).map(str::to_string);
    let series_index = issue.map(f64::from);

    let mut record = MetadataRecord {
        title: detail.title,
        authors: detail.authors,
        beam_ebooks_id,
        series,
        series_index,
        source_relevance: relevance,
    };

    cleaner.clean(&mut record);

    if sink.send(record).is_err() {
        warn!(url = %url, "Result sink is closed, dropping record");
    }
}
