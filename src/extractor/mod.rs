//! Multi-pass content extraction.
//!
//! Turns an arbitrary, loosely-structured HTML document into a content
//! model. The pipeline is fail-soft: it runs inside user-facing request
//! paths, so any internal failure yields a minimal placeholder model
//! instead of an error.

pub mod claims;
pub mod fields;
pub mod infer;
pub mod passes;

use crate::definition::PageDefinition;
use crate::dom;
use crate::error::{Error, Result};
use crate::metadata;
use crate::model::WebsiteContent;
use crate::patterns::collapse_whitespace;
use passes::PassContext;

/// Extract a content model from HTML, optionally driven by a declarative
/// page definition. Never fails: internal errors degrade to
/// [`WebsiteContent::placeholder`].
#[must_use]
pub fn extract(html: &str, definition: Option<&PageDefinition>) -> WebsiteContent {
    match extract_inner(html, definition) {
        Ok(model) => model,
        Err(err) => {
            if cfg!(debug_assertions) {
                eprintln!("sitepatch: extraction failed, returning placeholder: {err}");
            }
            WebsiteContent::placeholder()
        }
    }
}

fn extract_inner(html: &str, definition: Option<&PageDefinition>) -> Result<WebsiteContent> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let doc = dom::parse(html);
    let mut site_metadata = metadata::extract_metadata(&doc);

    let mut ctx = PassContext::new(&doc);

    // Declarative path first: configured selectors claim their elements so
    // the heuristic passes only supplement what the definition missed.
    if let Some(def) = definition {
        def.validate()?;
        passes::definition_pass(&mut ctx, def);

        if let Some(title_sel) = def.metadata.title.as_deref() {
            if let Some(el) = dom::try_query(&doc, title_sel) {
                let text = collapse_whitespace(&dom::text_content(&el));
                if !text.is_empty() {
                    site_metadata.title = text;
                }
            }
        }
        if let Some(desc_sel) = def.metadata.description.as_deref() {
            if let Some(el) = dom::try_query(&doc, desc_sel) {
                let text = collapse_whitespace(&dom::text_content(&el));
                if !text.is_empty() {
                    site_metadata.description = text;
                }
            }
        }
    }

    passes::semantic_pass(&mut ctx);
    passes::container_pass(&mut ctx);
    passes::orphan_pass(&mut ctx);
    passes::sort_pass(&mut ctx);

    if ctx.sections.is_empty() {
        passes::synthesize_whole_page(&mut ctx);
    }

    Ok(WebsiteContent {
        metadata: site_metadata,
        sections: ctx.sections,
        assets: metadata::collect_assets(&doc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionType;

    #[test]
    fn empty_input_yields_placeholder() {
        let model = extract("   ", None);
        assert_eq!(model.metadata.title, "Extraction Failed");
        assert!(model.sections.is_empty());
    }

    #[test]
    fn model_is_never_empty() {
        let model = extract("<html><body><p>one paragraph</p></body></html>", None);
        assert!(!model.sections.is_empty());
    }

    #[test]
    fn definition_sections_come_before_heuristic_supplements() {
        let html = r#"<body>
            <div class="banner"><h1>Hello</h1></div>
            <footer><p>Bottom</p></footer>
        </body>"#;
        let definition: PageDefinition = serde_json::from_value(serde_json::json!({
            "sections": [{ "id": "hero", "selector": ".banner", "type": "hero" }]
        }))
        .unwrap();

        let model = extract(html, Some(&definition));
        let ids: Vec<_> = model.sections.iter().map(|s| s.id.as_str()).collect();
        assert!(ids.contains(&"hero"));
        assert!(model
            .sections
            .iter()
            .any(|s| s.section_type == SectionType::Footer));
    }

    #[test]
    fn invalid_definition_degrades_to_placeholder() {
        let definition: PageDefinition = serde_json::from_value(serde_json::json!({
            "sections": [
                { "id": "a", "selector": "div" },
                { "id": "a", "selector": "p" }
            ]
        }))
        .unwrap();

        let model = extract("<body><div>x</div></body>", Some(&definition));
        assert_eq!(model.metadata.title, "Extraction Failed");
    }

    #[test]
    fn definition_metadata_selectors_override_heuristics() {
        let html = r#"<html><head><title>Head Title</title></head>
            <body><h1 class="site-name">Visible Name</h1></body></html>"#;
        let definition: PageDefinition = serde_json::from_value(serde_json::json!({
            "metadata": { "title": ".site-name" }
        }))
        .unwrap();

        let model = extract(html, Some(&definition));
        assert_eq!(model.metadata.title, "Visible Name");
    }
}
