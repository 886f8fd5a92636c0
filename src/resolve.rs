//! Shared element-resolution chains.
//!
//! Both the generator and the preview reconciler need to re-find a
//! section's element in a live document, and then a field's sub-target
//! within it. Each concern is an ordered chain where the first match wins;
//! the chains live here so both callers resolve identically and each chain
//! can be tested on its own.

use dom_query::{Document, Selection};

use crate::dom;

/// Semantic tags tried when a section id names a well-known region
/// ("footer" -> `<footer>`, and so on).
const SEMANTIC_ID_TAGS: &[(&str, &str)] = &[
    ("header", "header"),
    ("footer", "footer"),
    ("nav", "nav"),
    ("main", "main"),
    ("sidebar", "aside"),
    ("aside", "aside"),
    ("article", "article"),
    ("section", "section"),
];

/// Fallback selectors for auxiliary section ids common across the static
/// site family this engine serves. Consulted only by the preview path,
/// after every generic strategy has failed.
const KNOWN_SECTION_FALLBACKS: &[(&str, &str)] = &[
    ("hero", "header, .hero, .banner"),
    ("about", ".about, #about-us"),
    ("services", ".services, #service-list"),
    ("features", ".features"),
    ("contact", ".contact, footer form, footer"),
    ("gallery", ".gallery"),
    ("testimonials", ".testimonials, .reviews"),
    ("team", ".team"),
    ("pricing", ".pricing"),
    ("faq", ".faq"),
];

/// Resolve a section's element: stored selector, then id, then
/// `data-section`/`data-section-id` attribute, then class, then the
/// semantic-tag heuristic. Returns `None` when nothing matches.
#[must_use]
pub fn resolve_section_element<'a>(
    doc: &'a Document,
    section_id: &str,
    stored_selector: Option<&str>,
) -> Option<Selection<'a>> {
    if let Some(selector) = stored_selector {
        if let Some(el) = dom::try_query(doc, selector) {
            return Some(el);
        }
    }

    if let Some(el) = dom::try_query(doc, &format!(r#"[id="{}"]"#, dom::attr_escape(section_id))) {
        return Some(el);
    }

    let escaped = dom::attr_escape(section_id);
    if let Some(el) = dom::try_query(
        doc,
        &format!(r#"[data-section="{escaped}"], [data-section-id="{escaped}"]"#),
    ) {
        return Some(el);
    }

    if dom::is_css_identifier(section_id) {
        if let Some(el) = dom::try_query(doc, &format!(".{section_id}")) {
            return Some(el);
        }
    }

    let id_lower = section_id.to_lowercase();
    for (name, tag) in SEMANTIC_ID_TAGS {
        if id_lower.contains(name) {
            if let Some(el) = dom::try_query(doc, tag) {
                return Some(el);
            }
        }
    }

    None
}

/// Preview-path resolution: the generic chain plus the known-id fallback
/// table.
#[must_use]
pub fn resolve_section_with_fallbacks<'a>(
    doc: &'a Document,
    section_id: &str,
    stored_selector: Option<&str>,
) -> Option<Selection<'a>> {
    if let Some(el) = resolve_section_element(doc, section_id, stored_selector) {
        return Some(el);
    }

    let id_lower = section_id.to_lowercase();
    for (name, fallback) in KNOWN_SECTION_FALLBACKS {
        if id_lower.contains(name) {
            if let Some(el) = dom::try_query(doc, fallback) {
                return Some(el);
            }
        }
    }

    None
}

// === Field sub-targets ===

fn first_of<'a>(section: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let found = dom::query_selector(section, selector);
    found.exists().then_some(found)
}

fn nth_heading<'a>(section: &Selection<'a>, index: usize) -> Option<Selection<'a>> {
    section
        .select("h1, h2, h3, h4, h5, h6")
        .nodes()
        .get(index)
        .map(|n| Selection::from(*n))
}

/// The paragraph immediately following the section's first heading, used
/// for subtitle-style fields on pages with a single heading.
fn paragraph_after_heading<'a>(section: &Selection<'a>) -> Option<Selection<'a>> {
    let heading = nth_heading(section, 0)?;
    let node = heading.nodes().first()?;
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            if s.node_name().is_some_and(|t| t.eq_ignore_ascii_case("p")) {
                return Some(Selection::from(s));
            }
            return None;
        }
        sibling = s.next_sibling();
    }
    None
}

fn contains_any(field: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| field.contains(k))
}

/// Resolve the element a string field applies to, within a resolved
/// section element.
///
/// Chain: explicit `data-field`/`data-section-field` markers, then the
/// field-name keyword heuristics. Subtitle keywords are checked before
/// title keywords because "subtitle" contains "title".
#[must_use]
pub fn resolve_field_target<'a>(section: &Selection<'a>, field: &str) -> Option<Selection<'a>> {
    let escaped = dom::attr_escape(field);
    if let Some(el) = dom::try_query_within(
        section,
        &format!(r#"[data-field="{escaped}"], [data-section-field="{escaped}"]"#),
    ) {
        return Some(el);
    }

    let field_lower = field.to_lowercase();

    if contains_any(&field_lower, &["subtitle", "subheading"]) {
        return nth_heading(section, 1).or_else(|| paragraph_after_heading(section));
    }
    if contains_any(&field_lower, &["title", "heading"]) {
        return nth_heading(section, 0);
    }
    if contains_any(&field_lower, &["text", "description", "body"]) {
        return first_of(section, "p");
    }
    if contains_any(&field_lower, &["cta", "button", "link"]) {
        return first_of(section, "a, button");
    }

    None
}

/// Whether an element is a simple text container that a preview change may
/// be applied to directly when no sub-target resolves.
#[must_use]
pub fn is_simple_text_container(sel: &Selection) -> bool {
    matches!(
        dom::tag_name(sel).as_deref(),
        Some("p" | "span" | "a" | "button")
    )
}
