//! Types for the identification orchestrator.

use std::collections::HashMap;
use thiserror::Error;

use crate::fetcher::FetchError;

/// Errors surfaced by [`identify`](super::identify).
///
/// Only search-phase failures appear here; failures inside individual
/// detail workers are scoped to that worker and visible solely through the
/// absence of records in the sink.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Neither a usable title nor a site identifier was supplied.
    #[error("insufficient metadata to search for this book")]
    InsufficientMetadata,

    /// The search-results fetch failed outright.
    #[error("search fetch failed: {0}")]
    Search(#[from] FetchError),
}

/// Input for one identification attempt. Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct IdentifyRequest {
    /// Book title as known to the caller, if any.
    pub title: Option<String>,
    /// Author display names, if any.
    pub authors: Vec<String>,
    /// Identifier scheme name to value. Only `beam-ebooks` is consumed.
    pub identifiers: HashMap<String, String>,
}
