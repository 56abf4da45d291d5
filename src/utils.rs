//! Utility functions for text truncation, markup escaping, and endpoint URLs.
//!
//! This module provides helper functions used throughout the application:
//! - Character-safe truncation for descriptions, log previews and message caps
//! - HTML escaping for untrusted article text embedded into markup
//! - Date formatting for digest headers
//! - Endpoint construction on top of configured base URLs

use chrono::NaiveDate;
use std::borrow::Cow;
use url::Url;

/// Truncate `s` to at most `max` characters.
///
/// Counts Unicode scalar values, not bytes, so a multi-byte character is
/// never split. Returns the (possibly borrowed) prefix and whether anything
/// was cut.
pub fn truncate_chars(s: &str, max: usize) -> (Cow<'_, str>, bool) {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => (Cow::Borrowed(&s[..byte_idx]), true),
        None => (Cow::Borrowed(s), false),
    }
}

/// Truncate `s` to `max` characters and append `...` when something was cut.
pub fn ellipsize(s: &str, max: usize) -> String {
    match truncate_chars(s, max) {
        (prefix, true) => format!("{prefix}..."),
        (whole, false) => whole.into_owned(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// a count of the omitted characters appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match truncate_chars(s, max) {
        (prefix, true) => {
            let omitted = s.chars().count() - max;
            format!("{prefix}…(+{omitted} chars)")
        }
        (whole, false) => whole.into_owned(),
    }
}

/// Escape untrusted text for HTML, both in element content and inside a
/// double-quoted attribute.
///
/// Replaces `&`, `<`, `>` and `"` with named entities, which is also the
/// entity set accepted by Telegram's HTML parse mode.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let text = html_escape::encode_text(s);
    if text.contains('"') {
        Cow::Owned(text.replace('"', "&quot;"))
    } else {
        text
    }
}

/// Format a date the way digest headers and subjects show it.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Append path segments to a base URL.
///
/// The base path's trailing empty segment is dropped first, so both
/// `https://host/v1` and `https://host/v1/` yield `https://host/v1/<segments>`.
/// Segments are percent-encoded individually; a segment containing `:` (as a
/// Telegram bot token does) is never mistaken for a URL scheme.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
