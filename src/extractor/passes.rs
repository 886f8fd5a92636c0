//! The multi-pass extraction pipeline.
//!
//! Four ordered passes build the section list: semantic tags, explicit
//! generic containers, orphaned body content, then a stable document-order
//! sort. Passes share one `PassContext` (claim registry + accumulator) and
//! run as an explicit pipeline, so each pass stays independently testable.
//! A declarative definition pass can run first for known documents.

use dom_query::{Document, Selection};

use crate::definition::{FieldDefinition, FieldKind, PageDefinition};
use crate::dom;
use crate::extractor::claims::ClaimRegistry;
use crate::extractor::fields::extract_fields;
use crate::extractor::infer::{self, IdAllocator};
use crate::model::{FieldValue, ImageRef, LinkRef, Section, SectionType};
use crate::patterns::collapse_whitespace;

/// Semantic tags and their section types, in pass order.
const SEMANTIC_TAGS: &[(&str, SectionType)] = &[
    ("header", SectionType::Hero),
    ("nav", SectionType::Navigation),
    ("main", SectionType::Main),
    ("footer", SectionType::Footer),
    ("article", SectionType::Article),
    ("aside", SectionType::Sidebar),
];

/// Tags never extracted as orphan sections.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template", "link", "meta"];

/// Shared state threaded through the pass pipeline. Lives for exactly one
/// extraction call.
pub struct PassContext<'a> {
    pub doc: &'a Document,
    pub claims: ClaimRegistry,
    pub ids: IdAllocator,
    pub sections: Vec<Section>,
}

impl<'a> PassContext<'a> {
    #[must_use]
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            claims: ClaimRegistry::new(),
            ids: IdAllocator::new(),
            sections: Vec::new(),
        }
    }

    /// Claim an element and append its section if it yields any fields.
    fn claim_section(&mut self, element: &Selection, tag: &str, section_type: SectionType) {
        let Some(node_id) = dom::node_id(element) else {
            return;
        };

        // Claim before extracting so the field extractor treats this
        // element as the owner of its own subtree.
        self.claims.claim(node_id);
        self.push_claimed_section(element, tag, section_type);
    }

    /// Append a section for an already-claimed element if it yields fields.
    fn push_claimed_section(&mut self, element: &Selection, tag: &str, section_type: SectionType) {
        let content = extract_fields(element, &self.claims);
        if content.is_empty() {
            return;
        }

        let id = self.ids.assign(element, tag);
        self.sections.push(Section {
            label: infer::label_for(&id),
            id,
            section_type,
            content,
            selector: infer::selector_for(element),
        });
    }
}

/// Pass 1: semantic tags in fixed order.
///
/// All matches are claimed before any field extraction runs, so content
/// inside a nested semantic element (a nav within a header, an article
/// within main) belongs to the inner element's section only.
pub fn semantic_pass(ctx: &mut PassContext) {
    let mut matched = Vec::new();
    for (tag, section_type) in SEMANTIC_TAGS {
        for node in ctx.doc.select(tag).nodes().to_vec() {
            if ctx.claims.is_claimed(node.id) {
                continue;
            }
            ctx.claims.claim(node.id);
            matched.push((node, *tag, *section_type));
        }
    }

    for (node, tag, section_type) in matched {
        ctx.push_claimed_section(&Selection::from(node), tag, section_type);
    }
}

/// Pass 2: explicit generic containers (`section` elements and anything
/// carrying a `data-section` marker) not nested inside a claimed element.
pub fn container_pass(ctx: &mut PassContext) {
    let matches: Vec<_> = ctx
        .doc
        .select("section, [data-section], [data-section-id]")
        .nodes()
        .to_vec();
    for node in matches {
        if ctx.claims.is_claimed(node.id) || ctx.claims.is_inside_claimed(&node) {
            continue;
        }
        let element = Selection::from(node);
        let tag = dom::tag_name(&element).unwrap_or_else(|| "section".to_string());
        let section_type = infer::infer_container_type(&element);
        ctx.claim_section(&element, &tag, section_type);
    }
}

/// Pass 3: orphaned content — direct children of `body` that are neither
/// claimed nor nested inside a claimed element but still hold text.
pub fn orphan_pass(ctx: &mut PassContext) {
    let body = ctx.doc.select("body");
    let Some(body_node) = body.nodes().first().copied() else {
        return;
    };

    for node in body_node.children() {
        if !node.is_element() {
            continue;
        }
        let element = Selection::from(node);
        let Some(tag) = dom::tag_name(&element) else {
            continue;
        };
        if NON_CONTENT_TAGS.contains(&tag.as_str()) {
            continue;
        }
        if ctx.claims.is_claimed(node.id) || ctx.claims.is_inside_claimed(&node) {
            continue;
        }
        // Skip wrappers whose visible text all belongs to claimed subtrees
        if collapse_whitespace(&unclaimed_text(&element, &ctx.claims)).is_empty() {
            continue;
        }
        ctx.claim_section(&element, &tag, SectionType::Orphan);
    }
}

fn unclaimed_text(element: &Selection, claims: &ClaimRegistry) -> String {
    let Some(root) = element.nodes().first() else {
        return String::new();
    };
    let mut out = String::new();
    for node in root.descendants() {
        if !node.is_text() {
            continue;
        }
        if let Some(parent) = node.parent() {
            if claims.is_claimed(parent.id) || claims.is_inside_claimed(&parent) {
                continue;
            }
            if let Some(tag) = parent.node_name() {
                if tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style") {
                    continue;
                }
            }
        }
        out.push_str(&node.text());
        out.push(' ');
    }
    out
}

/// Pass 4: stable sort by resolved document position.
///
/// Resolution order per section: stored selector, then id lookup, then end
/// of document for anything unresolvable.
pub fn sort_pass(ctx: &mut PassContext) {
    let doc = ctx.doc;
    let positions = dom::position_index(doc);

    let resolve_position = |section: &Section| -> usize {
        if let Some(selector) = section.selector.as_deref() {
            if let Some(el) = dom::try_query(doc, selector) {
                if let Some(pos) = dom::node_id(&el).and_then(|id| positions.get(&id)) {
                    return *pos;
                }
            }
        }
        if let Some(el) = dom::try_query(doc, &format!(r#"[id="{}"]"#, section.id)) {
            if let Some(pos) = dom::node_id(&el).and_then(|id| positions.get(&id)) {
                return *pos;
            }
        }
        usize::MAX
    };

    ctx.sections.sort_by_key(resolve_position);
}

/// Final fallback: a document with no extractable sections still yields one
/// content section covering the whole body, so the model is never empty.
/// The section is appended even when the body yields no fields.
pub fn synthesize_whole_page(ctx: &mut PassContext) {
    let body = ctx.doc.select("body");
    if !body.exists() {
        return;
    }

    let content = extract_fields(&body, &ctx.claims);
    let id = ctx.ids.assign(&body, "page");
    ctx.sections.push(Section {
        label: "Page Content".to_string(),
        id,
        section_type: SectionType::Content,
        content,
        selector: Some("body".to_string()),
    });
}

/// Declarative pass: build sections by resolving configured selectors
/// instead of heuristics. Claimed elements are excluded from the heuristic
/// passes that run afterwards as a supplement.
pub fn definition_pass(ctx: &mut PassContext, definition: &PageDefinition) {
    for section_def in &definition.sections {
        let Some(element) = dom::try_query(ctx.doc, &section_def.selector) else {
            if cfg!(debug_assertions) {
                eprintln!(
                    "sitepatch: definition selector '{}' matched nothing for section '{}'",
                    section_def.selector, section_def.id
                );
            }
            continue;
        };
        let Some(node_id) = dom::node_id(&element) else {
            continue;
        };
        ctx.claims.claim(node_id);

        let content = if section_def.fields.is_empty() {
            extract_fields(&element, &ctx.claims)
        } else {
            let mut map = std::collections::BTreeMap::new();
            for field_def in &section_def.fields {
                if let Some(value) = extract_defined_field(&element, field_def) {
                    map.insert(field_def.name.clone(), value);
                }
            }
            map
        };

        let section_type = section_def
            .section_type
            .unwrap_or_else(|| infer::infer_container_type(&element));
        ctx.sections.push(Section {
            id: section_def.id.clone(),
            section_type,
            label: section_def
                .label
                .clone()
                .unwrap_or_else(|| infer::label_for(&section_def.id)),
            content,
            selector: Some(section_def.selector.clone()),
        });
    }
}

fn extract_defined_field(element: &Selection, field_def: &FieldDefinition) -> Option<FieldValue> {
    match field_def.kind {
        FieldKind::Text => {
            let target = dom::try_query_within(element, &field_def.selector)?;
            let text = collapse_whitespace(&dom::text_content(&target));
            (!text.is_empty()).then_some(FieldValue::Text(text))
        }
        FieldKind::TextList => {
            let matched = dom::try_query_all_within(element, &field_def.selector)?;
            let texts: Vec<String> = matched
                .nodes()
                .iter()
                .map(|n| collapse_whitespace(&Selection::from(*n).text()))
                .filter(|t| !t.is_empty())
                .collect();
            (!texts.is_empty()).then_some(FieldValue::TextList(texts))
        }
        FieldKind::Links => {
            let matched = dom::try_query_all_within(element, &field_def.selector)?;
            let links: Vec<LinkRef> = matched
                .nodes()
                .iter()
                .map(|n| Selection::from(*n))
                .map(|a| LinkRef {
                    text: collapse_whitespace(&a.text()),
                    href: dom::get_attribute(&a, "href").unwrap_or_default(),
                })
                .filter(|l| !l.text.is_empty() || !l.href.is_empty())
                .collect();
            (!links.is_empty()).then_some(FieldValue::Links(links))
        }
        FieldKind::Images => {
            let matched = dom::try_query_all_within(element, &field_def.selector)?;
            let images: Vec<ImageRef> = matched
                .nodes()
                .iter()
                .map(|n| Selection::from(*n))
                .filter_map(|img| {
                    let src = dom::get_attribute(&img, "src")?;
                    Some(ImageRef {
                        src,
                        alt: dom::get_attribute(&img, "alt").unwrap_or_default(),
                    })
                })
                .collect();
            (!images.is_empty()).then_some(FieldValue::Images(images))
        }
        FieldKind::Lists => {
            let matched = dom::try_query_all_within(element, &field_def.selector)?;
            let lists: Vec<Vec<String>> = matched
                .nodes()
                .iter()
                .map(|n| {
                    Selection::from(*n)
                        .select("li")
                        .nodes()
                        .iter()
                        .map(|li| collapse_whitespace(&Selection::from(*li).text()))
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|items| !items.is_empty())
                .collect();
            (!lists.is_empty()).then_some(FieldValue::NestedLists(lists))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_heuristics(doc: &Document) -> Vec<Section> {
        let mut ctx = PassContext::new(doc);
        semantic_pass(&mut ctx);
        container_pass(&mut ctx);
        orphan_pass(&mut ctx);
        sort_pass(&mut ctx);
        if ctx.sections.is_empty() {
            synthesize_whole_page(&mut ctx);
        }
        ctx.sections
    }

    #[test]
    fn semantic_pass_claims_in_tag_order() {
        let doc = dom::parse(
            r#"<body>
                <header><h1>Site</h1></header>
                <footer><p>Footer text</p></footer>
            </body>"#,
        );
        let mut ctx = PassContext::new(&doc);
        semantic_pass(&mut ctx);

        assert_eq!(ctx.sections.len(), 2);
        assert_eq!(ctx.sections[0].section_type, SectionType::Hero);
        assert_eq!(ctx.sections[1].section_type, SectionType::Footer);
        assert_eq!(ctx.claims.len(), 2);
    }

    #[test]
    fn empty_semantic_elements_are_skipped() {
        let doc = dom::parse("<body><header></header><p>text</p></body>");
        let mut ctx = PassContext::new(&doc);
        semantic_pass(&mut ctx);
        assert!(ctx.sections.is_empty());
    }

    #[test]
    fn nested_semantic_elements_split_cleanly() {
        let doc = dom::parse(
            r#"<body>
                <header>
                    <h1>Site</h1>
                    <nav><a href="/home">Home</a><a href="/about">About</a></nav>
                </header>
            </body>"#,
        );
        let sections = run_heuristics(&doc);

        assert_eq!(sections.len(), 2);
        let hero = sections
            .iter()
            .find(|s| s.section_type == SectionType::Hero)
            .unwrap();
        let nav = sections
            .iter()
            .find(|s| s.section_type == SectionType::Navigation)
            .unwrap();

        // The anchors belong to the nav section only
        assert!(!hero.content.contains_key("links"));
        match &nav.content["links"] {
            FieldValue::Links(links) => assert_eq!(links.len(), 2),
            other => panic!("expected links, got {other:?}"),
        }
    }

    #[test]
    fn nested_article_text_is_not_duplicated() {
        let doc = dom::parse(
            r#"<body>
                <main>
                    <p>Intro</p>
                    <article><h2>Post</h2><p>Body text</p></article>
                </main>
            </body>"#,
        );
        let sections = run_heuristics(&doc);

        let main = sections
            .iter()
            .find(|s| s.section_type == SectionType::Main)
            .unwrap();
        let article = sections
            .iter()
            .find(|s| s.section_type == SectionType::Article)
            .unwrap();

        assert_eq!(
            main.content["paragraphs"],
            FieldValue::TextList(vec!["Intro".to_string()])
        );
        assert_eq!(
            article.content["paragraphs"],
            FieldValue::TextList(vec!["Body text".to_string()])
        );
        assert!(!main.content.contains_key("heading"));
    }

    #[test]
    fn container_pass_skips_nested_in_claimed() {
        let doc = dom::parse(
            r#"<body>
                <main><section><p>Inside main</p></section></main>
                <section><p>Standalone</p></section>
            </body>"#,
        );
        let sections = run_heuristics(&doc);

        // main claims its whole subtree; only the standalone section is added
        let types: Vec<_> = sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Main, SectionType::Content]);
    }

    #[test]
    fn orphan_pass_catches_loose_content() {
        let doc = dom::parse("<body><div>Loose text at body level</div></body>");
        let sections = run_heuristics(&doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Orphan);
        assert_eq!(
            sections[0].content["text"],
            FieldValue::Text("Loose text at body level".to_string())
        );
    }

    #[test]
    fn sections_sorted_by_document_position() {
        let doc = dom::parse(
            r#"<body>
                <section><p>First in document</p></section>
                <header><h1>Header later in pass order</h1></header>
            </body>"#,
        );
        // Pass order extracts the header first; the sort pass restores
        // document order.
        let sections = run_heuristics(&doc);
        assert_eq!(sections[0].section_type, SectionType::Content);
        assert_eq!(sections[1].section_type, SectionType::Hero);
    }

    #[test]
    fn whole_page_synthesis_when_nothing_extracts() {
        let doc = dom::parse("<body>Bare text directly in body</body>");
        let sections = run_heuristics(&doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Content);
        assert_eq!(sections[0].selector.as_deref(), Some("body"));
    }

    #[test]
    fn empty_body_still_yields_a_section() {
        let doc = dom::parse("<body></body>");
        let sections = run_heuristics(&doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Content);
        assert!(sections[0].content.is_empty());
    }

    #[test]
    fn definition_pass_uses_configured_selectors() {
        let doc = dom::parse(
            r#"<body>
                <div class="banner"><h1>Big Title</h1><p>Sub</p></div>
            </body>"#,
        );
        let definition: PageDefinition = serde_json::from_value(serde_json::json!({
            "sections": [{
                "id": "hero",
                "selector": ".banner",
                "type": "hero",
                "fields": [
                    { "name": "heading", "selector": "h1" },
                    { "name": "subtitle", "selector": "p" }
                ]
            }]
        }))
        .unwrap();

        let mut ctx = PassContext::new(&doc);
        definition_pass(&mut ctx, &definition);

        assert_eq!(ctx.sections.len(), 1);
        let section = &ctx.sections[0];
        assert_eq!(section.id, "hero");
        assert_eq!(section.section_type, SectionType::Hero);
        assert_eq!(section.content["heading"], FieldValue::Text("Big Title".to_string()));
        assert_eq!(section.content["subtitle"], FieldValue::Text("Sub".to_string()));
        assert_eq!(section.selector.as_deref(), Some(".banner"));
    }

    #[test]
    fn definition_pass_skips_unmatched_selectors() {
        let doc = dom::parse("<body><p>content</p></body>");
        let definition: PageDefinition = serde_json::from_value(serde_json::json!({
            "sections": [{ "id": "missing", "selector": "#nope" }]
        }))
        .unwrap();

        let mut ctx = PassContext::new(&doc);
        definition_pass(&mut ctx, &definition);
        assert!(ctx.sections.is_empty());
    }
}
