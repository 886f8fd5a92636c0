//! Reversible change highlighting for preview documents.
//!
//! `add_highlights` marks the elements a set of changes would touch so a
//! preview surface can outline them; `strip_highlights` removes every
//! trace. The two functions are exact inverses over the marker class, the
//! change-id attribute, and the injected style block.

use dom_query::Document;

use crate::dom;
use crate::error::{Error, Result};
use crate::model::{PreviewChange, METADATA_SECTION_ID};
use crate::reconcile::SectionHint;
use crate::resolve;

const HIGHLIGHT_CLASS: &str = "sitepatch-highlight";
const CHANGE_ID_ATTR: &str = "data-change-id";
const STYLE_MARKER_ATTR: &str = "data-sitepatch-style";

const HIGHLIGHT_CSS: &str = concat!(
    ".sitepatch-highlight{",
    "outline:2px dashed #f59e0b;",
    "outline-offset:2px;",
    "background-color:rgba(245,158,11,0.08);",
    "}"
);

/// Mark the elements the given changes would touch.
///
/// Each resolved element gains the highlight class and a
/// `data-change-id="{section_id}:{field}"` attribute; one marked style
/// block is injected into the head. Idempotent: highlighting an already
/// highlighted document changes nothing.
pub fn add_highlights(
    html: &str,
    changes: &[PreviewChange],
    hints: Option<&[SectionHint]>,
) -> Result<String> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let doc = dom::parse(html);
    ensure_style_block(&doc);

    for change in changes {
        // Metadata changes have no visible element to outline.
        if change.section_id == METADATA_SECTION_ID {
            continue;
        }

        let stored_selector = hints
            .and_then(|hints| hints.iter().find(|h| h.id == change.section_id))
            .and_then(|h| h.selector.as_deref());

        let Some(element) =
            resolve::resolve_section_with_fallbacks(&doc, &change.section_id, stored_selector)
        else {
            continue;
        };

        let target = resolve::resolve_field_target(&element, &change.field).unwrap_or(element);
        dom::add_class(&target, HIGHLIGHT_CLASS);
        dom::set_attribute(
            &target,
            CHANGE_ID_ATTR,
            &format!("{}:{}", change.section_id, change.field),
        );
    }

    Ok(doc.html().to_string())
}

/// Remove every highlight marker: the style block, the marker class, and
/// the change-id attribute. Safe on documents that were never highlighted.
pub fn strip_highlights(html: &str) -> Result<String> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let doc = dom::parse(html);

    dom::remove(&doc.select(&format!("style[{STYLE_MARKER_ATTR}]")));

    let marked = doc.select(&format!(".{HIGHLIGHT_CLASS}, [{CHANGE_ID_ATTR}]"));
    for node in marked.nodes() {
        let el = dom_query::Selection::from(*node);
        dom::remove_class(&el, HIGHLIGHT_CLASS);
        dom::remove_attribute(&el, CHANGE_ID_ATTR);
    }

    Ok(doc.html().to_string())
}

fn ensure_style_block(doc: &Document) {
    if doc
        .select(&format!("style[{STYLE_MARKER_ATTR}]"))
        .exists()
    {
        return;
    }
    let style = format!(r#"<style {STYLE_MARKER_ATTR}="1">{HIGHLIGHT_CSS}</style>"#);
    let head = doc.select("head");
    if head.exists() {
        dom::append_html(&head, &style);
    } else {
        let body = doc.select("body");
        if body.exists() {
            dom::append_html(&body, &style);
        }
    }
}
