//! Best-effort field scraping from free-text citation blobs (BibTeX-like).
//! Not a bibliography parser: no nesting, no escapes, first substring match wins.

use crate::registry::RegistryEntry;

fn is_opener(byte: u8) -> bool {
    byte == b'{' || byte == b'"'
}

fn is_closer(byte: u8) -> bool {
    byte == b'}' || byte == b'"'
}

/// Newlines become spaces, whitespace runs collapse to one space, ends trimmed.
fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scrape the value following the first occurrence of `field`.
///
/// The value opens at the first `{` or `"` at or after the match and closes at the
/// next `}` or `"`. Open and close delimiters are picked independently, so
/// `title{Mixed"` yields `Mixed`. Returns an empty string when the citation is
/// missing, the field never occurs, or a delimiter is missing.
pub fn scrape_field(citation: Option<&str>, field: &str) -> String {
    let Some(citation) = citation.filter(|c| !c.is_empty()) else {
        return String::new();
    };
    let Some(start) = citation.find(field) else {
        return String::new();
    };

    let bytes = citation.as_bytes();
    let Some(open) = (start..bytes.len()).find(|&i| is_opener(bytes[i])) else {
        return String::new();
    };
    let Some(close) = (open + 1..bytes.len()).find(|&i| is_closer(bytes[i])) else {
        return String::new();
    };

    // Delimiters are ASCII, so both offsets sit on char boundaries.
    collapse_whitespace(&citation[open + 1..close])
}

/// Registry author when present, otherwise the citation's `author` field.
pub fn scrape_creator(entry: &RegistryEntry) -> String {
    match entry.author.as_deref() {
        Some(author) if !author.is_empty() => author.to_string(),
        _ => scrape_field(entry.citation.as_deref(), "author"),
    }
}

pub fn scrape_title(citation: Option<&str>) -> String {
    scrape_field(citation, "title")
}
