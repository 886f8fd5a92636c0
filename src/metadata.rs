//! Site-level metadata and asset extraction.
//!
//! Metadata heuristics follow an ordered fallback chain per field: the
//! explicit document source first, social-graph meta tags second, visible
//! DOM content last. The asset summary is a derived, read-only view and is
//! rebuilt from scratch on every extraction.

use chrono::Utc;
use dom_query::Document;

use crate::dom;
use crate::model::{AssetSummary, LinkRef, SiteMetadata, SCHEMA_VERSION};
use crate::patterns::collapse_whitespace;

/// Extract site-level metadata from a document.
///
/// Title chain: `<title>` -> `og:title` -> first `h1` -> `"Untitled Page"`.
/// Description chain: `meta[name=description]` -> `og:description` -> empty.
#[must_use]
pub fn extract_metadata(doc: &Document) -> SiteMetadata {
    SiteMetadata {
        title: extract_title(doc),
        description: extract_description(doc),
        last_modified: Utc::now(),
        schema_version: SCHEMA_VERSION,
    }
}

fn extract_title(doc: &Document) -> String {
    let title_el = doc.select("head title");
    if title_el.exists() {
        let text = collapse_whitespace(&dom::text_content(&title_el));
        if !text.is_empty() {
            return text;
        }
    }

    if let Some(og) = dom::get_attribute(&doc.select(r#"meta[property="og:title"]"#), "content") {
        let og = collapse_whitespace(&og);
        if !og.is_empty() {
            return og;
        }
    }

    let h1 = doc.select("h1");
    if h1.exists() {
        let text = collapse_whitespace(&dom::text_content(&h1));
        if !text.is_empty() {
            return text;
        }
    }

    "Untitled Page".to_string()
}

fn extract_description(doc: &Document) -> String {
    for selector in [
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ] {
        if let Some(content) = dom::get_attribute(&doc.select(selector), "content") {
            let content = collapse_whitespace(&content);
            if !content.is_empty() {
                return content;
            }
        }
    }
    String::new()
}

/// Collect the document-wide asset summary: every image source and every
/// non-empty anchor, in document order, deduplicated by value.
#[must_use]
pub fn collect_assets(doc: &Document) -> AssetSummary {
    let mut images = Vec::new();
    for node in doc.select("img").nodes() {
        let img = dom_query::Selection::from(*node);
        if let Some(src) = dom::get_attribute(&img, "src") {
            if !src.trim().is_empty() && !images.contains(&src) {
                images.push(src);
            }
        }
    }

    let mut links = Vec::new();
    for node in doc.select("a[href]").nodes() {
        let anchor = dom_query::Selection::from(*node);
        let text = collapse_whitespace(&dom::text_content(&anchor));
        let href = dom::get_attribute(&anchor, "href").unwrap_or_default();
        if text.is_empty() && href.is_empty() {
            continue;
        }
        let link = LinkRef { text, href };
        if !links.contains(&link) {
            links.push(link);
        }
    }

    AssetSummary { images, links }
}
