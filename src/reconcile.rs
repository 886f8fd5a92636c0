//! Preview reconciliation: patching approved changes into live HTML.
//!
//! Unlike the generator, which replays a whole model, this path applies an
//! arbitrary subset of changes onto a document that may have drifted since
//! extraction. Resolution is therefore more forgiving (known-id fallbacks,
//! self-targeting for simple containers) and every change is individually
//! fail-soft.

use dom_query::Document;
use serde_json::Value;

use crate::dom;
use crate::error::{Error, Result};
use crate::generator;
use crate::model::{ChangeType, FieldValue, PreviewChange, Section, METADATA_SECTION_ID};
use crate::resolve;

/// Optional per-section resolution hints, usually carried over from the
/// model the changes were diffed against.
#[derive(Debug, Clone)]
pub struct SectionHint {
    pub id: String,
    pub selector: Option<String>,
}

impl From<&Section> for SectionHint {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            selector: section.selector.clone(),
        }
    }
}

/// Apply approved changes onto an HTML document.
///
/// Only `Update` changes are applied; `Add` and `Remove` describe
/// structural edits this path does not perform, and are skipped. A change
/// whose section or field cannot be resolved is skipped too; the remaining
/// changes still land.
pub fn apply_changes(
    html: &str,
    changes: &[PreviewChange],
    hints: Option<&[SectionHint]>,
) -> Result<String> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let doc = dom::parse(html);
    for change in changes {
        apply_one(&doc, change, hints);
    }
    Ok(doc.html().to_string())
}

fn apply_one(doc: &Document, change: &PreviewChange, hints: Option<&[SectionHint]>) {
    if change.change_type != ChangeType::Update {
        skip(change, "not an update");
        return;
    }

    if change.section_id == METADATA_SECTION_ID {
        apply_metadata_change(doc, change);
        return;
    }

    let Some(value) = field_value_from(&change.proposed_value) else {
        skip(change, "proposed value has no applicable shape");
        return;
    };

    let stored_selector = hints
        .and_then(|hints| hints.iter().find(|h| h.id == change.section_id))
        .and_then(|h| h.selector.as_deref());

    let Some(element) =
        resolve::resolve_section_with_fallbacks(doc, &change.section_id, stored_selector)
    else {
        skip(change, "section element not found");
        return;
    };

    generator::apply_field_value(&element, &change.field, &value, true);
}

/// Metadata-section updates patch the title element or description meta
/// tag directly.
fn apply_metadata_change(doc: &Document, change: &PreviewChange) {
    let Value::String(text) = &change.proposed_value else {
        skip(change, "metadata value is not a string");
        return;
    };

    match change.field.as_str() {
        "title" => {
            let title = doc.select("head title");
            if title.exists() {
                dom::set_text(&title, text);
            } else {
                skip(change, "no title element");
            }
        }
        "description" => {
            let meta = doc.select(r#"head meta[name="description"]"#);
            if meta.exists() {
                dom::set_attribute(&meta, "content", text);
            } else {
                skip(change, "no description meta tag");
            }
        }
        _ => skip(change, "unknown metadata field"),
    }
}

/// Deserialize a change payload into a field value. `Null` carries no
/// content to apply.
fn field_value_from(value: &Value) -> Option<FieldValue> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn skip(change: &PreviewChange, reason: &str) {
    if cfg!(debug_assertions) {
        eprintln!(
            "sitepatch: skipping change {}:{} ({reason})",
            change.section_id, change.field
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(section_id: &str, field: &str, proposed: Value) -> PreviewChange {
        PreviewChange {
            section_id: section_id.to_string(),
            section_label: section_id.to_string(),
            field: field.to_string(),
            change_type: ChangeType::Update,
            current_value: Value::Null,
            proposed_value: proposed,
            source: None,
            timestamp: None,
        }
    }

    #[test]
    fn heading_update_lands_in_section() {
        let html = r#"<html><body><div id="hero"><h1>Old</h1></div></body></html>"#;
        let out = apply_changes(html, &[update("hero", "heading", json!("New"))], None).unwrap();
        assert!(out.contains("<h1>New</h1>"));
    }

    #[test]
    fn metadata_title_update() {
        let html = "<html><head><title>Old</title></head><body></body></html>";
        let out = apply_changes(
            html,
            &[update(METADATA_SECTION_ID, "title", json!("Fresh"))],
            None,
        )
        .unwrap();
        assert!(out.contains("<title>Fresh</title>"));
    }

    #[test]
    fn add_and_remove_changes_are_skipped() {
        let html = r#"<html><body><div id="hero"><h1>Kept</h1></div></body></html>"#;
        let mut change = update("hero", "*", json!({"heading": "never"}));
        change.change_type = ChangeType::Add;
        let out = apply_changes(html, &[change], None).unwrap();
        assert!(out.contains("Kept"));
        assert!(!out.contains("never"));
    }

    #[test]
    fn hint_selector_takes_priority() {
        let html = r#"<html><body>
            <div class="first"><h1>A</h1></div>
            <div class="second"><h1>B</h1></div>
        </body></html>"#;
        let hints = vec![SectionHint {
            id: "intro".to_string(),
            selector: Some(".second".to_string()),
        }];
        let out = apply_changes(
            html,
            &[update("intro", "heading", json!("Patched"))],
            Some(&hints),
        )
        .unwrap();
        assert!(out.contains("<h1>A</h1>"));
        assert!(out.contains("<h1>Patched</h1>"));
    }

    #[test]
    fn known_fallback_resolution_applies() {
        let html = r#"<html><body><div class="testimonials"><p>old quote</p></div></body></html>"#;
        let out = apply_changes(
            html,
            &[update("testimonials-1", "text", json!("new quote"))],
            None,
        )
        .unwrap();
        assert!(out.contains("new quote"));
    }

    #[test]
    fn simple_container_takes_value_directly() {
        let html = r#"<html><body><p id="tagline">old words</p></body></html>"#;
        let out = apply_changes(html, &[update("tagline", "slogan", json!("new words"))], None)
            .unwrap();
        assert!(out.contains("new words"));
    }

    #[test]
    fn unresolvable_change_leaves_document_intact() {
        let html = r#"<html><body><div id="hero"><h1>Safe</h1></div></body></html>"#;
        let out =
            apply_changes(html, &[update("phantom", "heading", json!("lost"))], None).unwrap();
        assert!(out.contains("Safe"));
        assert!(!out.contains("lost"));
    }

    #[test]
    fn list_payload_round_trips_through_json() {
        let html = r#"<html><body><div id="menu"><ul><li>a</li></ul></div></body></html>"#;
        let out = apply_changes(
            html,
            &[update("menu", "lists", json!([["x", "y"]]))],
            None,
        )
        .unwrap();
        assert!(out.contains("<li>x</li><li>y</li>"));
    }

    #[test]
    fn empty_html_is_an_error() {
        assert!(matches!(
            apply_changes("", &[], None),
            Err(Error::EmptyDocument)
        ));
    }
}
