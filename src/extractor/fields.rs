//! Field extraction from a claimed element.
//!
//! Given one claimed section element, pulls out typed fields — heading,
//! paragraphs, lists, links, images — while excluding any subtree owned by
//! a nested claimed element. When no typed field yields anything, falls back
//! to the element's loose text so no content is silently dropped.

use std::collections::BTreeMap;

use dom_query::{NodeId, Selection};

use crate::dom;
use crate::extractor::claims::ClaimRegistry;
use crate::model::{FieldValue, ImageRef, LinkRef};
use crate::patterns::collapse_whitespace;

/// Extract the content map for one claimed section element.
///
/// Subtrees owned by *other* claimed elements nested inside this one are
/// skipped; they belong to their own sections.
#[must_use]
pub fn extract_fields(section: &Selection, claims: &ClaimRegistry) -> BTreeMap<String, FieldValue> {
    let mut content = BTreeMap::new();
    let Some(section_id) = dom::node_id(section) else {
        return content;
    };

    if let Some(heading) = first_heading(section, claims, section_id) {
        content.insert("heading".to_string(), FieldValue::Text(heading));
    }

    let paragraphs = owned_texts(section, "p", claims, section_id);
    if !paragraphs.is_empty() {
        content.insert("paragraphs".to_string(), FieldValue::TextList(paragraphs));
    }

    let lists = owned_lists(section, claims, section_id);
    if !lists.is_empty() {
        content.insert("lists".to_string(), FieldValue::NestedLists(lists));
    }

    let links = owned_links(section, claims, section_id);
    if !links.is_empty() {
        content.insert("links".to_string(), FieldValue::Links(links));
    }

    let images = owned_images(section, claims, section_id);
    if !images.is_empty() {
        content.insert("images".to_string(), FieldValue::Images(images));
    }

    if content.is_empty() {
        let text = loose_text(section, claims, section_id);
        if !text.is_empty() {
            content.insert("text".to_string(), FieldValue::Text(text));
        }
    }

    content
}

/// Whether a node inside the section belongs to this section (not to a
/// nested claimed element, and not claimed itself).
fn is_owned_here(
    node: &dom_query::NodeRef,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> bool {
    node.id == section_id
        || (!claims.is_claimed(node.id) && !claims.is_owned_below(node, section_id))
}

fn first_heading(
    section: &Selection,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> Option<String> {
    for node in section.select("h1, h2, h3, h4, h5, h6").nodes() {
        if !is_owned_here(node, claims, section_id) {
            continue;
        }
        let text = collapse_whitespace(&Selection::from(*node).text());
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn owned_texts(
    section: &Selection,
    selector: &str,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> Vec<String> {
    let mut out = Vec::new();
    for node in section.select(selector).nodes() {
        if !is_owned_here(node, claims, section_id) {
            continue;
        }
        let text = collapse_whitespace(&Selection::from(*node).text());
        if !text.is_empty() {
            out.push(text);
        }
    }
    out
}

fn owned_lists(
    section: &Selection,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> Vec<Vec<String>> {
    let mut lists = Vec::new();
    for node in section.select("ul, ol").nodes() {
        if !is_owned_here(node, claims, section_id) {
            continue;
        }
        let list = Selection::from(*node);
        let items: Vec<String> = list
            .select("li")
            .nodes()
            .iter()
            .map(|li| collapse_whitespace(&Selection::from(*li).text()))
            .filter(|t| !t.is_empty())
            .collect();
        if !items.is_empty() {
            lists.push(items);
        }
    }
    lists
}

fn owned_links(
    section: &Selection,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> Vec<LinkRef> {
    let mut links = Vec::new();
    for node in section.select("a[href]").nodes() {
        if !is_owned_here(node, claims, section_id) {
            continue;
        }
        let anchor = Selection::from(*node);
        let text = collapse_whitespace(&anchor.text());
        let href = dom::get_attribute(&anchor, "href").unwrap_or_default();
        if !text.is_empty() || !href.is_empty() {
            links.push(LinkRef { text, href });
        }
    }
    links
}

fn owned_images(
    section: &Selection,
    claims: &ClaimRegistry,
    section_id: NodeId,
) -> Vec<ImageRef> {
    let mut images = Vec::new();
    for node in section.select("img").nodes() {
        if !is_owned_here(node, claims, section_id) {
            continue;
        }
        let img = Selection::from(*node);
        let src = dom::get_attribute(&img, "src").unwrap_or_default();
        if src.is_empty() {
            continue;
        }
        let alt = dom::get_attribute(&img, "alt").unwrap_or_default();
        images.push(ImageRef { src, alt });
    }
    images
}

/// Concatenate the section's text nodes, excluding those inside nested
/// claimed subtrees and inside script/style, with whitespace collapsed.
fn loose_text(section: &Selection, claims: &ClaimRegistry, section_id: NodeId) -> String {
    let Some(root) = section.nodes().first() else {
        return String::new();
    };

    let mut out = String::new();
    for node in root.descendants() {
        if !node.is_text() {
            continue;
        }
        if let Some(parent) = node.parent() {
            if let Some(tag) = parent.node_name() {
                if tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style") {
                    continue;
                }
            }
            if claims.is_claimed(parent.id) && parent.id != section_id {
                continue;
            }
            if claims.is_owned_below(&parent, section_id) {
                continue;
            }
        }
        out.push_str(&node.text());
        out.push(' ');
    }
    collapse_whitespace(&out)
}
