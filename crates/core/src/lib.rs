//! Metadata identification for the Beam Ebooks catalogue.
//!
//! Given a title, an author list, or a known `beam-ebooks` identifier, this
//! crate locates the matching detail page on the site, fetches and parses it
//! concurrently, and emits structured [`MetadataRecord`] values through a
//! caller-supplied result sink. The host application owns the plugin
//! lifecycle, logging subscriber, and final metadata cleanup; this crate only
//! consumes those collaborators through trait seams.

pub mod config;
pub mod fetcher;
pub mod identify;
pub mod metadata;
pub mod parser;
pub mod search;
pub mod testing;

pub use config::{load_config, load_config_from_str, ConfigError, SourceConfig};
pub use fetcher::{FetchError, HttpFetcher, PageFetcher};
pub use identify::{identify, IdentifyError, IdentifyRequest};
pub use metadata::{
    book_url, MetadataCleaner, MetadataRecord, NoopCleaner, BEAM_EBOOKS_SCHEME, SOURCE_NAME,
};
pub use parser::{cycle_for_issue, parse_detail, DetailPage, ParsedTitle};
pub use search::{build_search_query, resolve_candidates, SearchQuery};
