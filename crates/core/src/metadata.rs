//! Metadata record and host-facing hooks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier scheme consumed by this source.
pub const BEAM_EBOOKS_SCHEME: &str = "beam-ebooks";

/// Display name of this metadata source.
pub const SOURCE_NAME: &str = "Beam Ebooks";

/// A single metadata candidate produced by the identification pipeline.
///
/// Built exactly once per successfully processed detail page and handed to
/// the result sink; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Canonical title, absent when the detail page had no usable heading.
    pub title: Option<String>,
    /// Author display names in document order. Duplicates are possible when
    /// both structural scans match the same author.
    pub authors: Vec<String>,
    /// Numeric site identifier extracted from the detail URL.
    pub beam_ebooks_id: Option<String>,
    /// Cycle name for serialized works, looked up from the issue number.
    pub series: Option<String>,
    /// Issue number within the series.
    pub series_index: Option<f64>,
    /// Position of the candidate in the result list; smallest is best.
    pub source_relevance: usize,
}

/// Post-processing hook applied to each record before it reaches the sink.
///
/// The host application supplies its own normalization here; the pipeline
/// treats it as opaque.
pub trait MetadataCleaner: Send + Sync {
    fn clean(&self, record: &mut MetadataRecord);
}

/// Cleaner that leaves records untouched.
#[derive(Debug, Default)]
pub struct NoopCleaner;

impl MetadataCleaner for NoopCleaner {
    fn clean(&self, _record: &mut MetadataRecord) {}
}

/// Resolve a known identifier to its `(scheme, id, url)` triple.
///
/// Returns `None` when no `beam-ebooks` identifier is present. No network
/// access is involved.
pub fn book_url(
    identifiers: &HashMap<String, String>,
    base_url: &str,
) -> Option<(String, String, String)> {
    let id = identifiers.get(BEAM_EBOOKS_SCHEME)?;
    let url = format!("{}/ebook/{}", base_url.trim_end_matches('/'), id);
    Some((BEAM_EBOOKS_SCHEME.to_string(), id.clone(), url))
}
