//! DOM operations adapter.
//!
//! Thin, named-operation layer over the `dom_query` crate. Centralizing DOM
//! access here keeps the extraction and reconciliation code readable and
//! gives every dynamic selector a single, non-panicking resolution path:
//! selectors stored in a content model are data, not trusted input, so they
//! always go through [`try_query`] / [`try_query_all`].

use std::collections::HashMap;

// Re-export core types for internal and external use
pub use dom_query::{Document, NodeId, Selection};

// Re-export StrTendril so callers can hold zero-copy text
pub use tendril::StrTendril;

// === Parsing ===

/// Parse an HTML string into a document.
///
/// The parser is permissive (html5ever under the hood) and never fails;
/// malformed markup produces a best-effort tree.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute operations ===

/// Get the element id attribute.
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Check if an attribute exists.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

// === Class list editing ===
//
// Implemented over the class attribute directly so the operations stay
// idempotent: adding a class twice is a no-op, removing the last class
// removes the attribute entirely.

/// Add a class token if not already present.
pub fn add_class(sel: &Selection, class: &str) {
    let existing = get_attribute(sel, "class").unwrap_or_default();
    if existing.split_whitespace().any(|c| c == class) {
        return;
    }
    let merged = if existing.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {class}", existing.trim())
    };
    set_attribute(sel, "class", &merged);
}

/// Remove a class token; drops the attribute when no tokens remain.
pub fn remove_class(sel: &Selection, class: &str) {
    let Some(existing) = get_attribute(sel, "class") else {
        return;
    };
    let remaining: Vec<&str> = existing
        .split_whitespace()
        .filter(|c| *c != class)
        .collect();
    if remaining.is_empty() {
        remove_attribute(sel, "class");
    } else {
        set_attribute(sel, "class", &remaining.join(" "));
    }
}

// === Tag / node information ===

/// Get the tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Get the `NodeId` of the first node in a selection.
#[inline]
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

// === Text content ===

/// Get all text content of the node and its descendants.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

// === Querying ===

/// Query the first element matching a trusted, static CSS selector.
#[inline]
#[must_use]
pub fn query_selector<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select_single(selector)
}

/// Resolve a dynamic selector string against the document, returning `None`
/// for invalid selectors or empty matches instead of panicking.
#[must_use]
pub fn try_query<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    let matched = doc.try_select(selector)?;
    if matched.is_empty() {
        return None;
    }
    // First match wins when the selector is ambiguous
    matched.nodes().first().map(|n| Selection::from(*n))
}

/// Resolve a dynamic selector string within a selection.
#[must_use]
pub fn try_query_within<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let matched = sel.try_select(selector)?;
    if matched.is_empty() {
        return None;
    }
    matched.nodes().first().map(|n| Selection::from(*n))
}

/// Resolve a dynamic selector within a selection, keeping every match.
#[must_use]
pub fn try_query_all_within<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let matched = sel.try_select(selector)?;
    if matched.is_empty() {
        return None;
    }
    Some(matched)
}

// === Tree manipulation ===

/// Set inner HTML content.
#[inline]
pub fn set_inner_html(sel: &Selection, html: &str) {
    sel.set_html(html);
}

/// Append HTML content inside an element.
#[inline]
pub fn append_html(sel: &Selection, html: &str) {
    sel.append_html(html);
}

/// Remove elements from the tree.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Set an element's text content, escaping markup characters.
///
/// `dom_query` exposes HTML-level mutation only, so plain text is routed
/// through [`escape_html`] before `set_html`.
pub fn set_text(sel: &Selection, text: &str) {
    set_inner_html(sel, &escape_html(text));
}

// === Document order ===

/// Build a document-order index: `NodeId` -> position.
///
/// `select("*")` iterates descendants in document order, which makes the
/// resulting map a stable sort key for section ordering.
#[must_use]
pub fn position_index(doc: &Document) -> HashMap<NodeId, usize> {
    doc.select("*")
        .nodes()
        .iter()
        .enumerate()
        .map(|(pos, node)| (node.id, pos))
        .collect()
}

// === Escaping ===

/// Whether a value is usable directly as a CSS identifier (in `#id` or
/// `.class` form) without escaping.
#[must_use]
pub fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escape a value for use inside a double-quoted attribute selector string.
#[must_use]
pub fn attr_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text for safe insertion into HTML content or attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
