//! Declarative page definitions.
//!
//! A page definition is the escape hatch for known documents: instead of
//! heuristic inference, sections and metadata are built by resolving
//! configured selectors directly. Definitions are plain data — they can be
//! deserialized from JSON and validated without ever touching a parser —
//! which also lets the declarative and heuristic paths be tested against
//! the same content model contract.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::SectionType;

/// How a configured field's value should be read from its element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Collapsed text content of the first matching element.
    #[default]
    Text,

    /// Text content of every matching element, in document order.
    TextList,

    /// `{text, href}` of every matching anchor.
    Links,

    /// `{src, alt}` of every matching image.
    Images,

    /// Item texts of every matching list, as one array per list.
    Lists,
}

/// One configured field within a section definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name in the section's content map.
    pub name: String,

    /// Selector resolved within the section's element.
    pub selector: String,

    #[serde(default)]
    pub kind: FieldKind,
}

/// One configured section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: String,

    /// Selector for the section's element, resolved against the document.
    pub selector: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, rename = "type")]
    pub section_type: Option<SectionType>,

    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Metadata field selector mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDefinition {
    /// Selector for the element holding the page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Selector for the element holding the page description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A declarative selector map for a known document family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDefinition {
    #[serde(default)]
    pub metadata: MetadataDefinition,

    #[serde(default)]
    pub sections: Vec<SectionDefinition>,
}

impl PageDefinition {
    /// Validate the definition as plain data.
    ///
    /// Rejects duplicate section ids and empty id/selector strings. Selector
    /// syntax itself is not validated here; resolution is non-panicking and
    /// treats an unparsable selector as a non-match.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if section.id.trim().is_empty() {
                return Err(Error::InvalidDefinition("section with empty id".to_string()));
            }
            if section.selector.trim().is_empty() {
                return Err(Error::InvalidDefinition(format!(
                    "section '{}' has an empty selector",
                    section.id
                )));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(Error::InvalidDefinition(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            for field in &section.fields {
                if field.name.trim().is_empty() || field.selector.trim().is_empty() {
                    return Err(Error::InvalidDefinition(format!(
                        "section '{}' has a field with an empty name or selector",
                        section.id
                    )));
                }
            }
        }
        Ok(())
    }
}
