//! Detail page parsing.
//!
//! Extracts the heading and author anchors from a detail page and folds the
//! heading through title normalization. Every field is extracted on its own:
//! a structural mismatch in one leaves the others intact and is logged, never
//! raised.

mod cycles;
mod title;

pub use cycles::cycle_for_issue;
pub use title::{normalize_title, ParsedTitle};

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

/// Substring that marks an anchor as an author link.
const AUTHOR_LINK_MARKER: &str = "/autoreninfo.php";

/// CSS selectors used for detail pages.
struct Selectors {
    /// Detail heading.
    heading: Selector,
    /// Author anchors, direct placement.
    author_direct: Selector,
    /// Author anchors, nested inside a paragraph.
    author_nested: Selector,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| Selectors {
    heading: Selector::parse("td > h2").expect("invalid heading selector"),
    author_direct: Selector::parse("td a").expect("invalid author selector"),
    author_nested: Selector::parse("td > p > a").expect("invalid author selector"),
});

/// Everything the parser recovers from one detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    /// Canonical title, absent when the page had no usable heading.
    pub title: Option<String>,
    /// Issue number recovered during title normalization.
    pub series_index: Option<String>,
    /// Author names in document order; both structural passes are
    /// concatenated and duplicates are preserved.
    pub authors: Vec<String>,
}

/// Parse a decoded detail page.
pub fn parse_detail(html: &str) -> DetailPage {
    let doc = Html::parse_document(html);

    let parsed_title = match extract_heading(&doc) {
        Some(heading) => normalize_title(&heading),
        None => {
            debug!("Detail page has no heading at the expected location");
            ParsedTitle::default()
        }
    };

    let authors = extract_authors(&doc);

    DetailPage {
        title: parsed_title.title,
        series_index: parsed_title.series_index,
        authors,
    }
}

/// First heading at the expected structural location, if any.
fn extract_heading(doc: &Html) -> Option<String> {
    let elem = doc.select(&SELECTORS.heading).next()?;
    let text = elem.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Author names from both structural passes, direct placement first.
fn extract_authors(doc: &Html) -> Vec<String> {
    let mut authors = Vec::new();
    for selector in [&SELECTORS.author_direct, &SELECTORS.author_nested] {
        for anchor in doc.select(selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(AUTHOR_LINK_MARKER) {
                continue;
            }
            let name = anchor.text().collect::<String>().trim().to_string();
            if !name.is_empty() {
                authors.push(name);
            }
        }
    }

    if authors.is_empty() {
        debug!("No author anchors matched on detail page");
    }
    authors
}
