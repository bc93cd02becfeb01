//! Pure text normalization shared by the section renderers.
//!
//! Citation bodies arrive as markup; they are tag-stripped, then cut to a
//! fixed number of characters, then marked with an ellipsis only when
//! something was actually cut.

use chrono::DateTime;

/// Maximum characters of a citation body shown on a card.
pub const EXCERPT_MAX_CHARS: usize = 200;

pub const ELLIPSIS: &str = "...";

pub const EMPTY_BODY_PLACEHOLDER: &str = "No content";

/// Separator between a promoted heading and its badge.
pub const HEADING_BADGE_SEPARATOR: &str = " - ";

/// Remove every `<...>` tag. A `<` with no closing `>` is kept as text.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Keep at most `max` characters. Returns whether anything was dropped.
pub fn truncate_chars(input: &str, max: usize) -> (String, bool) {
    match input.char_indices().nth(max) {
        Some((idx, _)) => (input[..idx].to_string(), true),
        None => (input.to_string(), false),
    }
}

/// Card excerpt for a note or knowledgebase body.
pub fn citation_excerpt(body: &str) -> String {
    let stripped = strip_tags(body);
    if stripped.trim().is_empty() {
        return EMPTY_BODY_PLACEHOLDER.to_string();
    }
    match truncate_chars(&stripped, EXCERPT_MAX_CHARS) {
        (kept, true) => format!("{kept}{ELLIPSIS}"),
        (kept, false) => kept,
    }
}

/// Similarity in `[0, 1]` as a whole percentage.
pub fn relevance_percent(similarity: f64) -> i64 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 100.0).round() as i64
}

pub fn relevance_label(similarity: f64) -> String {
    format!("{}%", relevance_percent(similarity))
}

/// Split a promoted heading into its primary text and optional badge.
pub fn split_heading(heading: &str) -> (String, Option<String>) {
    match heading.split_once(HEADING_BADGE_SEPARATOR) {
        Some((primary, badge)) => {
            let badge = badge.trim();
            (
                primary.to_string(),
                (!badge.is_empty()).then(|| badge.to_string()),
            )
        }
        None => (heading.to_string(), None),
    }
}

/// Minimal markup fragment carrying plain text.
pub fn paragraph_fragment(text: &str) -> String {
    format!("<p>{}</p>", html_escape::encode_text(text))
}

/// Caption for a section date. RFC 3339 stamps are shortened, anything else
/// is shown as given.
pub fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(stamp) => stamp.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

/// Collapse runs of whitespace into single spaces.
pub fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<br/>"), "");
    }

    #[test]
    fn test_excerpt_truncates_long_body() {
        let body = "x".repeat(250);
        let excerpt = citation_excerpt(&body);
        assert_eq!(excerpt, format!("{}...", "x".repeat(200)));
    }

    #[test]
    fn test_excerpt_keeps_short_body() {
        let body = "y".repeat(150);
        assert_eq!(citation_excerpt(&body), body);
    }

    #[test]
    fn test_excerpt_counts_chars_after_stripping() {
        let body = format!("<div>{}</div>", "z".repeat(200));
        assert_eq!(citation_excerpt(&body), "z".repeat(200));
    }

    #[test]
    fn test_excerpt_empty_body() {
        assert_eq!(citation_excerpt("<p>  </p>"), "No content");
        assert_eq!(citation_excerpt(""), "No content");
    }

    #[test]
    fn test_truncate_multibyte() {
        let (kept, cut) = truncate_chars("héllo wörld", 4);
        assert_eq!(kept, "héll");
        assert!(cut);
    }

    #[test]
    fn test_relevance_percent() {
        assert_eq!(relevance_label(0.8734), "87%");
        assert_eq!(relevance_label(1.0), "100%");
        assert_eq!(relevance_label(0.5), "50%");
        assert_eq!(relevance_label(f64::NAN), "0%");
    }

    #[test]
    fn test_split_heading() {
        assert_eq!(
            split_heading("Acme Corp - Sponsored"),
            ("Acme Corp".to_string(), Some("Sponsored".to_string()))
        );
        assert_eq!(split_heading("Acme Corp"), ("Acme Corp".to_string(), None));
        assert_eq!(split_heading("Acme-Corp"), ("Acme-Corp".to_string(), None));
    }

    #[test]
    fn test_paragraph_fragment_escapes() {
        assert_eq!(paragraph_fragment("a <b> & c"), "<p>a &lt;b&gt; &amp; c</p>");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01T10:15:00Z"), "2024-03-01 10:15");
        assert_eq!(format_date("last week"), "last week");
    }
}
