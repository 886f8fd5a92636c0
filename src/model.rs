//! Content model and change record types.
//!
//! The content model is the structured, editable projection of a page that
//! every other component consumes: extraction produces it, the differ
//! compares two snapshots of it, and the generator applies it back onto
//! HTML. A model is created fresh on every extraction call; edits produce a
//! new model rather than mutating one in place.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current content model schema version, stamped into `SiteMetadata`.
pub const SCHEMA_VERSION: u32 = 1;

/// Reserved section id used for metadata-level changes in diffs.
pub const METADATA_SECTION_ID: &str = "metadata";

/// A link reference: anchor text plus target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub text: String,
    pub href: String,
}

/// An image reference: source URL plus alternative text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// One value in a section's content map.
///
/// There is deliberately no fixed schema here: the map is a projection of
/// whatever the source element contained. Serialization is untagged so the
/// JSON form is the natural one (`"text"`, `["a","b"]`, `[{...}]`).
///
/// Untagged deserialization tries variants in declaration order, so the
/// sequence shapes must come before the struct shapes: serde will build a
/// `LinkRef` out of any two-element sequence, which would swallow
/// `NestedLists` payloads if `Links` were tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single text value.
    Text(String),

    /// An ordered list of text values (paragraphs, list items).
    TextList(Vec<String>),

    /// Multiple lists, each an ordered list of item texts.
    NestedLists(Vec<Vec<String>>),

    /// Anchor references.
    Links(Vec<LinkRef>),

    /// Image references.
    Images(Vec<ImageRef>),
}

impl FieldValue {
    /// The value as a plain string, when it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a canonical JSON value for comparison and change records.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Section classification, inferred from tag semantics, an explicit
/// override attribute, or content shape — in that priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Hero,
    #[default]
    Content,
    List,
    Contact,
    Navigation,
    Footer,
    Article,
    Sidebar,
    Main,
    Orphan,
    Custom,
}

impl SectionType {
    /// Parse an explicit `data-section-type` override value.
    #[must_use]
    pub fn from_override(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "hero" => SectionType::Hero,
            "content" => SectionType::Content,
            "list" => SectionType::List,
            "contact" => SectionType::Contact,
            "navigation" | "nav" => SectionType::Navigation,
            "footer" => SectionType::Footer,
            "article" => SectionType::Article,
            "sidebar" | "aside" => SectionType::Sidebar,
            "main" => SectionType::Main,
            "orphan" => SectionType::Orphan,
            _ => SectionType::Custom,
        }
    }
}

/// One editable region of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier: the element's own id, its `data-section-id`
    /// attribute, or a synthesized `<tag>-<n>`. Unique within one model and
    /// stable across re-extraction of unmodified HTML.
    pub id: String,

    /// Inferred section classification.
    #[serde(rename = "type")]
    pub section_type: SectionType,

    /// Human-readable label shown to editors.
    pub label: String,

    /// Field map: projection of the source element's content.
    pub content: BTreeMap<String, FieldValue>,

    /// Locator generated at extraction time. Resolving it against the
    /// unmodified document returns the element that produced the section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Scalar site-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub title: String,

    pub description: String,

    /// Stamped at extraction time; not compared by the differ.
    pub last_modified: DateTime<Utc>,

    pub schema_version: u32,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            last_modified: Utc::now(),
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Derived, read-only summary of the document's images and links.
///
/// Never edited directly; regenerated fresh on each extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub images: Vec<String>,
    pub links: Vec<LinkRef>,
}

/// The structured, editable representation of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteContent {
    pub metadata: SiteMetadata,
    pub sections: Vec<Section>,
    pub assets: AssetSummary,
}

impl WebsiteContent {
    /// Minimal placeholder model returned when extraction fails internally.
    ///
    /// Editors immediately see the wrong title instead of an opaque error,
    /// and downstream code still has a well-formed model to work with.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            metadata: SiteMetadata {
                title: "Extraction Failed".to_string(),
                ..SiteMetadata::default()
            },
            sections: Vec::new(),
            assets: AssetSummary::default(),
        }
    }

    /// Find a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Kind of change between two content model snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Remove,
    Update,
}

/// Origin of a change, attached by the caller (not the differ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Manual,
    Ai,
}

/// One field-level difference between two content model snapshots.
///
/// Produced only by the differ. Values are canonical JSON so one record
/// type can carry either a single field value or (for whole-section add and
/// remove changes, where `field` is `"*"`) an entire content map. `Null`
/// encodes absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewChange {
    pub section_id: String,

    pub section_label: String,

    pub field: String,

    pub change_type: ChangeType,

    pub current_value: serde_json::Value,

    pub proposed_value: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ChangeSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_serializes_untagged() {
        let text = FieldValue::Text("hello".to_string());
        assert_eq!(text.to_json(), serde_json::json!("hello"));

        let list = FieldValue::TextList(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.to_json(), serde_json::json!(["a", "b"]));

        let links = FieldValue::Links(vec![LinkRef {
            text: "Home".to_string(),
            href: "/".to_string(),
        }]);
        assert_eq!(links.to_json(), serde_json::json!([{"text": "Home", "href": "/"}]));
    }

    #[test]
    fn field_value_deserializes_by_shape() {
        let text: FieldValue = serde_json::from_value(serde_json::json!("hello")).unwrap();
        assert_eq!(text, FieldValue::Text("hello".to_string()));

        let texts: FieldValue = serde_json::from_value(serde_json::json!(["a", "b"])).unwrap();
        assert_eq!(
            texts,
            FieldValue::TextList(vec!["a".to_string(), "b".to_string()])
        );

        let lists: FieldValue = serde_json::from_value(serde_json::json!([["x", "y"]])).unwrap();
        assert_eq!(
            lists,
            FieldValue::NestedLists(vec![vec!["x".to_string(), "y".to_string()]])
        );

        let links: FieldValue =
            serde_json::from_value(serde_json::json!([{"text": "Home", "href": "/"}])).unwrap();
        assert_eq!(
            links,
            FieldValue::Links(vec![LinkRef {
                text: "Home".to_string(),
                href: "/".to_string()
            }])
        );

        let images: FieldValue =
            serde_json::from_value(serde_json::json!([{"src": "/a.png", "alt": "a"}])).unwrap();
        assert_eq!(
            images,
            FieldValue::Images(vec![ImageRef {
                src: "/a.png".to_string(),
                alt: "a".to_string()
            }])
        );
    }

    #[test]
    fn section_type_override_parsing() {
        assert_eq!(SectionType::from_override("hero"), SectionType::Hero);
        assert_eq!(SectionType::from_override("NAV"), SectionType::Navigation);
        assert_eq!(SectionType::from_override("banner"), SectionType::Custom);
    }

    #[test]
    fn placeholder_model_shape() {
        let model = WebsiteContent::placeholder();
        assert_eq!(model.metadata.title, "Extraction Failed");
        assert!(model.sections.is_empty());
        assert_eq!(model.metadata.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn section_roundtrips_through_json() {
        let mut content = BTreeMap::new();
        content.insert("heading".to_string(), FieldValue::from("Welcome"));
        content.insert(
            "paragraphs".to_string(),
            FieldValue::TextList(vec!["First".to_string()]),
        );

        let section = Section {
            id: "hero-1".to_string(),
            section_type: SectionType::Hero,
            label: "Hero".to_string(),
            content,
            selector: Some("header".to_string()),
        };

        let json = serde_json::to_string(&section).unwrap();
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
        assert!(json.contains(r#""type":"hero""#));
    }
}
