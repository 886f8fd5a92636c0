//! Character encoding detection for the byte-level entry point.
//!
//! Hosted repositories serve pages as raw bytes, and legacy static sites are
//! not always UTF-8. This module sniffs the charset declaration from meta
//! tags and transcodes to UTF-8 before extraction, replacing invalid
//! sequences rather than failing.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Matches `<meta charset="...">`.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("META_CHARSET regex")
});

/// Matches `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("HTTP_EQUIV_CHARSET regex")
});

/// Detect the character encoding declared by an HTML document.
///
/// Only the first 1024 bytes are examined; charset declarations are required
/// to appear early. Falls back to UTF-8 when nothing is declared.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&*META_CHARSET, &*HTTP_EQUIV_CHARSET] {
        if let Some(label) = pattern
            .captures(&head_str)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
        {
            if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid characters are replaced with the Unicode replacement character
/// rather than causing an error.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
