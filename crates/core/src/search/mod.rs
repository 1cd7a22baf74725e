//! Search query construction and result resolution.
//!
//! Searches run against the site's title search endpoint only. Author-based
//! search is unsupported by the site and never attempted; callers with
//! authors but no usable title get `None`, which means "cannot search", not
//! an error.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

/// Path marker that distinguishes detail pages from everything else.
pub const DETAIL_PATH_MARKER: &str = "/ebook/";

/// CSS selectors used on search-result pages.
struct Selectors {
    /// Result anchor, direct placement.
    result_direct: Selector,
    /// Result anchor behind an intervening wrapper node.
    result_wrapped: Selector,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    result_direct: Selector::parse("td > a").expect("invalid result selector"),
    result_wrapped: Selector::parse("td > span > a").expect("invalid result selector"),
});

/// A fully-formed search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Complete request URL.
    pub url: String,
    /// Search text the URL was built from.
    pub title: String,
}

/// Build a search query from the available metadata.
///
/// Returns `None` when no usable title is present; authors alone never
/// produce a query.
pub fn build_search_query(
    base_url: &str,
    title: Option<&str>,
    authors: &[String],
) -> Option<SearchQuery> {
    let Some(title) = title else {
        if !authors.is_empty() {
            debug!("Author-only search is not supported by the site");
        }
        return None;
    };

    let text = rewrite_title(title);
    let url = format!(
        "{}/suchergebnis.php5?Type=Title&SearchString={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(text)
    );

    debug!(text = text, "Built search query");
    Some(SearchQuery {
        url,
        title: text.to_string(),
    })
}

/// Strip the canonical `PR<number> - ` prefix so the search runs on the
/// story title alone.
fn rewrite_title(title: &str) -> &str {
    if !title.starts_with("PR") {
        return title;
    }
    if let Some(pos) = title.find(" - ") {
        return &title[pos + 3..];
    }
    // Short form without the separator: PR2600-Titel
    if title.len() > 6 && title.as_bytes()[6] == b'-' {
        return &title[7..];
    }
    title
}

/// Extract candidate detail URLs from a decoded search-results page.
///
/// The first anchor reached by either structural pattern whose target
/// contains the detail path marker wins; an empty result is valid.
pub fn resolve_candidates(html: &str, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let base = base_url.trim_end_matches('/');

    for selector in [&SELECTORS.result_direct, &SELECTORS.result_wrapped] {
        for anchor in doc.select(selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(DETAIL_PATH_MARKER) {
                continue;
            }
            let url = if href.starts_with("http") {
                href.to_string()
            } else if href.starts_with('/') {
                format!("{}{}", base, href)
            } else {
                format!("{}/{}", base, href)
            };
            debug!(url = %url, "Resolved search result to detail page");
            return vec![url];
        }
    }

    debug!("Search results contained no detail page link");
    Vec::new()
}
