//! HTML generation from a full content model.
//!
//! Applies a content model onto a base HTML document to produce
//! publish-ready output. Resolution failures are field-level fail-soft:
//! a section or field that cannot be located is skipped with a debug
//! diagnostic and the rest of the model is still applied. Nothing here is
//! ever destructive toward unrelated content.

use dom_query::{Document, Selection};

use crate::dom;
use crate::error::{Error, Result};
use crate::model::{FieldValue, SiteMetadata, WebsiteContent};
use crate::resolve;

/// Apply a full content model onto a base HTML document.
///
/// Per-section resolution follows the chain in [`resolve::resolve_section_element`];
/// elements found without an id or `data-section` marker are stamped with
/// one so future resolutions are direct.
pub fn generate_html(base_html: &str, content: &WebsiteContent) -> Result<String> {
    if base_html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let doc = dom::parse(base_html);
    apply_metadata(&doc, &content.metadata);

    for section in &content.sections {
        let Some(element) =
            resolve::resolve_section_element(&doc, &section.id, section.selector.as_deref())
        else {
            if cfg!(debug_assertions) {
                eprintln!(
                    "sitepatch: no element resolved for section '{}', skipping",
                    section.id
                );
            }
            continue;
        };

        stamp_section_marker(&element, &section.id);

        for (field, value) in &section.content {
            apply_field_value(&element, field, value, false);
        }
    }

    Ok(doc.html().to_string())
}

/// Upsert the title element and description meta tag.
fn apply_metadata(doc: &Document, metadata: &SiteMetadata) {
    let head = doc.select("head");

    if !metadata.title.is_empty() {
        let title = doc.select("head title");
        if title.exists() {
            dom::set_text(&title, &metadata.title);
        } else if head.exists() {
            dom::append_html(
                &head,
                &format!("<title>{}</title>", dom::escape_html(&metadata.title)),
            );
        }
    }

    if !metadata.description.is_empty() {
        let meta = doc.select(r#"head meta[name="description"]"#);
        if meta.exists() {
            dom::set_attribute(&meta, "content", &metadata.description);
        } else if head.exists() {
            dom::append_html(
                &head,
                &format!(
                    r#"<meta name="description" content="{}">"#,
                    dom::escape_html(&metadata.description)
                ),
            );
        }
    }
}

/// Stamp a resolved element lacking any marker so future resolutions hit
/// it directly.
fn stamp_section_marker(element: &Selection, section_id: &str) {
    if dom::id(element).is_none()
        && !dom::has_attribute(element, "data-section")
        && !dom::has_attribute(element, "data-section-id")
    {
        dom::set_attribute(element, "data-section", section_id);
    }
}

/// Apply one field value inside a resolved section element, dispatching on
/// the value's shape.
///
/// `allow_self_target` enables the preview-path addition: when no
/// sub-target resolves and the section element itself is a simple text
/// container, a string value is applied to it directly.
pub(crate) fn apply_field_value(
    element: &Selection,
    field: &str,
    value: &FieldValue,
    allow_self_target: bool,
) {
    match value {
        FieldValue::Text(text) => {
            if let Some(target) = resolve::resolve_field_target(element, field) {
                set_element_text(&target, text);
            } else if allow_self_target && resolve::is_simple_text_container(element) {
                set_element_text(element, text);
            } else if cfg!(debug_assertions) {
                eprintln!("sitepatch: no sub-target for field '{field}', skipping");
            }
        }
        FieldValue::TextList(texts) => apply_paragraphs(element, texts),
        FieldValue::NestedLists(lists) => apply_lists(element, lists),
        FieldValue::Links(links) => apply_links(element, links),
        FieldValue::Images(images) => apply_images(element, images),
    }
}

/// Set an element's text, or its value for form controls.
fn set_element_text(target: &Selection, text: &str) {
    match dom::tag_name(target).as_deref() {
        Some("input") => dom::set_attribute(target, "value", text),
        Some("textarea") => dom::set_text(target, text),
        _ => dom::set_text(target, text),
    }
}

/// Zip texts positionally into existing paragraphs; append new paragraph
/// elements for any extras.
fn apply_paragraphs(element: &Selection, texts: &[String]) {
    let existing: Vec<_> = element.select("p").nodes().to_vec();
    for (index, text) in texts.iter().enumerate() {
        if let Some(node) = existing.get(index) {
            dom::set_text(&Selection::from(*node), text);
        } else {
            dom::append_html(element, &format!("<p>{}</p>", dom::escape_html(text)));
        }
    }
}

/// Zip list arrays positionally into existing list elements, rebuilding
/// each matched list's items; append new lists for extras.
fn apply_lists(element: &Selection, lists: &[Vec<String>]) {
    let existing: Vec<_> = element.select("ul, ol").nodes().to_vec();
    for (index, items) in lists.iter().enumerate() {
        let items_html: String = items
            .iter()
            .map(|item| format!("<li>{}</li>", dom::escape_html(item)))
            .collect();
        if let Some(node) = existing.get(index) {
            dom::set_inner_html(&Selection::from(*node), &items_html);
        } else {
            dom::append_html(element, &format!("<ul>{items_html}</ul>"));
        }
    }
}

/// Zip link entries positionally into existing anchors. Text and href are
/// updated independently; an empty entry side leaves the original alone.
fn apply_links(element: &Selection, links: &[crate::model::LinkRef]) {
    let existing: Vec<_> = element.select("a").nodes().to_vec();
    for (index, link) in links.iter().enumerate() {
        let Some(node) = existing.get(index) else {
            break;
        };
        let anchor = Selection::from(*node);
        if !link.text.is_empty() {
            dom::set_text(&anchor, &link.text);
        }
        if !link.href.is_empty() {
            dom::set_attribute(&anchor, "href", &link.href);
        }
    }
}

/// Zip image entries positionally into existing images.
fn apply_images(element: &Selection, images: &[crate::model::ImageRef]) {
    let existing: Vec<_> = element.select("img").nodes().to_vec();
    for (index, image) in images.iter().enumerate() {
        let Some(node) = existing.get(index) else {
            break;
        };
        let img = Selection::from(*node);
        if !image.src.is_empty() {
            dom::set_attribute(&img, "src", &image.src);
        }
        dom::set_attribute(&img, "alt", &image.alt);
    }
}
