//! Compiled regex patterns used across the extraction pipeline.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Collapses runs of whitespace (including newlines) to a single space.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Characters not allowed in a synthesized section id.
///
/// Synthesized ids double as CSS id selectors and `data-section` values, so
/// anything outside `[a-zA-Z0-9_-]` is replaced with `-`.
pub static ID_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("ID_UNSAFE regex"));

/// Collapse a string's whitespace runs and trim the ends.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input.trim(), " ").to_string()
}

/// Sanitize an arbitrary string into a selector-safe id token.
#[must_use]
pub fn sanitize_id(input: &str) -> String {
    ID_UNSAFE
        .replace_all(input.trim(), "-")
        .trim_matches('-')
        .to_string()
}
