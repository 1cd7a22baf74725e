//! Title normalization for serialized Perry Rhodan issues.
//!
//! The site encodes issue titles in two legacy forms. Both are folded into
//! the canonical `PR<4-digit-index> - <story title>` shape; anything else
//! passes through untouched.

use tracing::debug;

/// Marker for the dash form: `<story title> - Perry Rhodan <number>`.
const DASH_MARKER: &str = " - Perry Rhodan ";

/// Marker for the Heftroman form: the issue number sits in a fixed window
/// right after this prefix.
const HEFTROMAN_MARKER: &str = "PERRY RHODAN-Heftroman ";

/// Canonical title plus the recovered issue number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTitle {
    /// Canonical title, or the raw text when neither encoding matched.
    pub title: Option<String>,
    /// Decimal issue number; left-zero-padded to at least 4 digits when it
    /// came from the dash form.
    pub series_index: Option<String>,
}

/// Normalize an extracted heading into a [`ParsedTitle`].
///
/// Idempotent: canonical output contains neither marker, so running the
/// normalization again leaves the title unchanged.
pub fn normalize_title(raw: &str) -> ParsedTitle {
    if let Some(parsed) = normalize_dash_form(raw) {
        return parsed;
    }
    if let Some(parsed) = normalize_heftroman_form(raw) {
        return parsed;
    }

    ParsedTitle {
        title: Some(raw.to_string()),
        series_index: None,
    }
}

/// `<story title> - Perry Rhodan <number>` → `PR<number> - <story title>`.
fn normalize_dash_form(raw: &str) -> Option<ParsedTitle> {
    let pos = raw.find(DASH_MARKER)?;
    let prefix = &raw[..pos];
    let number = raw[pos + DASH_MARKER.len()..].trim();
    let padded = format!("{:0>4}", number);

    debug!(issue = %padded, "Normalized dash-form title");
    Some(ParsedTitle {
        title: Some(format!("PR{} - {}", padded, prefix)),
        series_index: Some(padded),
    })
}

/// `... PERRY RHODAN-Heftroman Nr<number>: <story title>` →
/// `PR<number> - <story title>`.
///
/// The issue number is the last 4 characters of the 6-character window that
/// follows the marker; the window ends 2 characters before the story title
/// begins.
fn normalize_heftroman_form(raw: &str) -> Option<ParsedTitle> {
    let pos = raw.find(HEFTROMAN_MARKER)?;
    let rest = &raw[pos + HEFTROMAN_MARKER.len()..];

    if rest.len() < 8
        || !rest.is_char_boundary(2)
        || !rest.is_char_boundary(6)
        || !rest.is_char_boundary(8)
    {
        debug!(rest = rest, "Heftroman marker without a full issue window");
        return None;
    }

    let number = &rest[2..6];
    let suffix = &rest[8..];

    debug!(issue = number, "Normalized Heftroman-form title");
    Some(ParsedTitle {
        title: Some(format!("PR{} - {}", number, suffix)),
        series_index: Some(number.to_string()),
    })
}
