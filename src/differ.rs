//! Field-level diffing of two content model snapshots.
//!
//! `diff_content` is a pure function: it never mutates its inputs and its
//! output order is deterministic — metadata title, metadata description,
//! then one pass per section id (previous model's order first, then ids
//! that only exist in the next model). `source` and `timestamp` are left
//! for the caller to attach.

use serde_json::Value;

use crate::model::{
    ChangeType, FieldValue, PreviewChange, Section, WebsiteContent, METADATA_SECTION_ID,
};

/// Compare two content model snapshots into an ordered list of changes.
///
/// Properties: `diff_content(x, x)` is empty for any model, and swapping
/// the arguments swaps `current_value`/`proposed_value` on every change.
#[must_use]
pub fn diff_content(previous: &WebsiteContent, next: &WebsiteContent) -> Vec<PreviewChange> {
    let mut changes = Vec::new();

    diff_metadata_field(
        &mut changes,
        "title",
        &previous.metadata.title,
        &next.metadata.title,
    );
    diff_metadata_field(
        &mut changes,
        "description",
        &previous.metadata.description,
        &next.metadata.description,
    );

    for id in section_id_union(previous, next) {
        match (previous.section(&id), next.section(&id)) {
            (Some(prev), Some(new)) => diff_section(&mut changes, prev, new),
            (None, Some(new)) => changes.push(section_level_change(new, ChangeType::Add)),
            (Some(prev), None) => changes.push(section_level_change(prev, ChangeType::Remove)),
            (None, None) => {}
        }
    }

    changes
}

/// Section ids in deterministic order: previous model's order, then any new
/// ids from the next model in its order.
fn section_id_union(previous: &WebsiteContent, next: &WebsiteContent) -> Vec<String> {
    let mut ids: Vec<String> = previous.sections.iter().map(|s| s.id.clone()).collect();
    for section in &next.sections {
        if !ids.iter().any(|id| *id == section.id) {
            ids.push(section.id.clone());
        }
    }
    ids
}

fn diff_metadata_field(
    changes: &mut Vec<PreviewChange>,
    field: &str,
    previous: &str,
    next: &str,
) {
    if previous == next {
        return;
    }
    changes.push(PreviewChange {
        section_id: METADATA_SECTION_ID.to_string(),
        section_label: "Page Metadata".to_string(),
        field: field.to_string(),
        change_type: ChangeType::Update,
        current_value: Value::String(previous.to_string()),
        proposed_value: Value::String(next.to_string()),
        source: None,
        timestamp: None,
    });
}

fn diff_section(changes: &mut Vec<PreviewChange>, previous: &Section, next: &Section) {
    // Union of field keys: previous's (sorted) keys first, then keys that
    // only exist in next.
    let mut fields: Vec<&String> = previous.content.keys().collect();
    for key in next.content.keys() {
        if !previous.content.contains_key(key) {
            fields.push(key);
        }
    }

    for field in fields {
        let prev_value = previous.content.get(field);
        let next_value = next.content.get(field);
        if values_equal(prev_value, next_value) {
            continue;
        }
        changes.push(PreviewChange {
            section_id: next.id.clone(),
            section_label: next.label.clone(),
            field: field.clone(),
            change_type: ChangeType::Update,
            current_value: prev_value.map_or(Value::Null, FieldValue::to_json),
            proposed_value: next_value.map_or(Value::Null, FieldValue::to_json),
            source: None,
            timestamp: None,
        });
    }
}

/// String values compare by string equality; everything else compares by
/// canonical JSON value.
fn values_equal(previous: Option<&FieldValue>, next: Option<&FieldValue>) -> bool {
    match (previous, next) {
        (None, None) => true,
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => a == b,
        (Some(a), Some(b)) => a.to_json() == b.to_json(),
        _ => false,
    }
}

fn section_level_change(section: &Section, change_type: ChangeType) -> PreviewChange {
    let content_value =
        serde_json::to_value(&section.content).unwrap_or(Value::Null);
    let (current_value, proposed_value) = match change_type {
        ChangeType::Add => (Value::Null, content_value),
        _ => (content_value, Value::Null),
    };
    PreviewChange {
        section_id: section.id.clone(),
        section_label: section.label.clone(),
        field: "*".to_string(),
        change_type,
        current_value,
        proposed_value,
        source: None,
        timestamp: None,
    }
}
