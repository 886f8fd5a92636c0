//! Content extraction, diffing, and reconciliation for HTML pages.
//!
//! `sitepatch` turns loosely-structured HTML into a structured content
//! model, computes field-level diffs between model snapshots, regenerates
//! HTML from a model, and patches approved changes back into live pages
//! with reversible preview highlights.
//!
//! # Quick Start
//!
//! ```rust
//! let html = r#"<html><head><title>My Site</title></head>
//!     <body><header><h1>Welcome</h1></header></body></html>"#;
//!
//! let content = sitepatch::extract_content(html);
//! assert_eq!(content.metadata.title, "My Site");
//!
//! let mut edited = content.clone();
//! edited.metadata.title = "My New Site".to_string();
//!
//! let changes = sitepatch::diff_content(&content, &edited);
//! assert_eq!(changes.len(), 1);
//!
//! let patched = sitepatch::apply_changes(html, &changes, None).unwrap();
//! assert!(patched.contains("<title>My New Site</title>"));
//! ```

mod definition;
mod differ;
mod dom;
mod encoding;
mod error;
mod extractor;
mod generator;
mod highlight;
mod metadata;
mod model;
mod patterns;
mod reconcile;
mod resolve;

pub use definition::{
    FieldDefinition, FieldKind, MetadataDefinition, PageDefinition, SectionDefinition,
};
pub use differ::diff_content;
pub use error::{Error, Result};
pub use generator::generate_html;
pub use highlight::{add_highlights, strip_highlights};
pub use model::{
    AssetSummary, ChangeSource, ChangeType, FieldValue, ImageRef, LinkRef, PreviewChange, Section,
    SectionType, SiteMetadata, WebsiteContent, METADATA_SECTION_ID, SCHEMA_VERSION,
};
pub use reconcile::{apply_changes, SectionHint};

/// Extract a content model from an HTML document using the heuristic
/// multi-pass pipeline. Never fails: malformed or empty input degrades to
/// a placeholder model.
#[must_use]
pub fn extract_content(html: &str) -> WebsiteContent {
    extractor::extract(html, None)
}

/// Extract a content model driven by a declarative page definition, with
/// the heuristic passes supplementing whatever the definition leaves
/// unclaimed.
#[must_use]
pub fn extract_with_definition(html: &str, definition: &PageDefinition) -> WebsiteContent {
    extractor::extract(html, Some(definition))
}

/// Extract from raw bytes, sniffing the character encoding from meta tags
/// and transcoding to UTF-8 first.
#[must_use]
pub fn extract_content_bytes(bytes: &[u8]) -> WebsiteContent {
    let html = encoding::transcode_to_utf8(bytes);
    extractor::extract(&html, None)
}
