//! Section identity and classification.
//!
//! Covers the three per-section inference concerns: stable id assignment,
//! selector synthesis, and section-type inference. Type inference is an
//! ordered chain of (name, rule) pairs so each rule stays independently
//! testable.

use std::collections::{HashMap, HashSet};

use dom_query::{NodeRef, Selection};

use crate::dom;
use crate::model::SectionType;
use crate::patterns::sanitize_id;

/// Explicit section-type override attribute.
pub const SECTION_TYPE_ATTR: &str = "data-section-type";

// === Id assignment ===

/// Allocates stable, unique section ids for one extraction call.
///
/// Explicit document ids win, then `data-section-id`, then a synthesized
/// `<tag>-<n>` with a per-tag counter in extraction order. An explicit id
/// that collides with an already-used one falls through to synthesis so the
/// uniqueness invariant holds even on sloppy documents.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: HashMap<String, usize>,
    used: HashSet<String>,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, sel: &Selection, tag: &str) -> String {
        for explicit in [dom::id(sel), dom::get_attribute(sel, "data-section-id")] {
            if let Some(id) = explicit {
                // Section ids double as selector tokens and data-section
                // values, so unsafe characters are stripped.
                let id = sanitize_id(&id);
                if !id.is_empty() && self.used.insert(id.clone()) {
                    return id;
                }
            }
        }

        loop {
            let counter = self.counters.entry(tag.to_string()).or_insert(0);
            *counter += 1;
            let candidate = format!("{tag}-{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

// === Selector synthesis ===

fn nth_of_type(node: &NodeRef) -> usize {
    let tag = node.node_name();
    let mut n = 1;
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() && s.node_name() == tag {
            n += 1;
        }
        sibling = s.prev_sibling();
    }
    n
}

/// Generate a locator for an element, preferring explicit markers and
/// falling back to a structural `nth-of-type` path anchored under `body`.
///
/// Contract: resolving the returned selector against the unmodified
/// document yields the element that produced it.
#[must_use]
pub fn selector_for(sel: &Selection) -> Option<String> {
    if let Some(id) = dom::id(sel) {
        if dom::is_css_identifier(&id) {
            return Some(format!("#{id}"));
        }
        return Some(format!(r#"[id="{}"]"#, dom::attr_escape(&id)));
    }

    if let Some(section_id) = dom::get_attribute(sel, "data-section-id") {
        return Some(format!(
            r#"[data-section-id="{}"]"#,
            dom::attr_escape(&section_id)
        ));
    }

    let node = sel.nodes().first()?;
    let mut segments = Vec::new();
    let mut current = Some(*node);
    while let Some(n) = current {
        let Some(tag) = n.node_name() else { break };
        let tag = tag.to_lowercase();
        if tag == "body" || tag == "html" {
            break;
        }
        segments.push(format!("{tag}:nth-of-type({})", nth_of_type(&n)));
        current = n.parent();
    }

    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(format!("body > {}", segments.join(" > ")))
}

// === Type inference ===

/// One type-inference rule: returns a classification or passes.
pub type TypeRule = (&'static str, fn(&Selection) -> Option<SectionType>);

fn override_rule(sel: &Selection) -> Option<SectionType> {
    dom::get_attribute(sel, SECTION_TYPE_ATTR).map(|v| SectionType::from_override(&v))
}

fn contact_rule(sel: &Selection) -> Option<SectionType> {
    sel.select("form").exists().then_some(SectionType::Contact)
}

fn list_rule(sel: &Selection) -> Option<SectionType> {
    sel.select("ul, ol").exists().then_some(SectionType::List)
}

fn hero_rule(sel: &Selection) -> Option<SectionType> {
    let has_heading = sel.select("h1, h2, h3, h4, h5, h6").exists();
    let has_body_content = sel.select("p").exists();
    (has_heading && !has_body_content).then_some(SectionType::Hero)
}

/// Ordered classification chain for generic containers. Explicit override
/// first, then content shape; first matching rule wins.
pub const CONTAINER_TYPE_RULES: &[TypeRule] = &[
    ("override", override_rule),
    ("contact", contact_rule),
    ("list", list_rule),
    ("hero", hero_rule),
];

/// Classify a generic container by the rule chain, defaulting to `Content`.
#[must_use]
pub fn infer_container_type(sel: &Selection) -> SectionType {
    for (_, rule) in CONTAINER_TYPE_RULES {
        if let Some(section_type) = rule(sel) {
            return section_type;
        }
    }
    SectionType::Content
}

// === Labels ===

/// Humanize a section id into an editor-facing label ("hero-1" -> "Hero 1").
#[must_use]
pub fn label_for(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
