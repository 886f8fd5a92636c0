use sitepatch::{extract_content, extract_content_bytes, FieldValue, SectionType};

#[test]
fn semantic_and_container_sections_are_both_extracted() {
    let html = r#"
        <html>
          <head>
            <title>Landing</title>
            <meta name="description" content="A small landing page">
          </head>
          <body>
            <header><h1>Welcome</h1><p>Tagline</p></header>
            <section id="about"><h2>About Us</h2><p>We build things.</p></section>
          </body>
        </html>
    "#;

    let content = extract_content(html);
    assert_eq!(content.metadata.title, "Landing");
    assert_eq!(content.metadata.description, "A small landing page");

    assert_eq!(content.sections.len(), 2);
    assert_eq!(content.sections[0].section_type, SectionType::Hero);
    assert_eq!(content.sections[1].id, "about");
    assert_eq!(
        content.sections[1].content["heading"],
        FieldValue::Text("About Us".to_string())
    );
}

#[test]
fn sections_come_out_in_document_order() {
    let html = r#"
        <body>
          <section id="first"><p>one</p></section>
          <header><h1>Title</h1></header>
          <section id="last"><p>two</p></section>
        </body>
    "#;

    let content = extract_content(html);
    let ids: Vec<&str> = content.sections.iter().map(|s| s.id.as_str()).collect();
    let first = ids.iter().position(|id| *id == "first").unwrap();
    let last = ids.iter().position(|id| *id == "last").unwrap();
    let header = content
        .sections
        .iter()
        .position(|s| s.section_type == SectionType::Hero)
        .unwrap();
    assert!(first < header);
    assert!(header < last);
}

#[test]
fn orphan_content_is_not_lost() {
    let html = r#"
        <body>
          <header><h1>Site</h1></header>
          <div>Loose paragraph the layout forgot about</div>
        </body>
    "#;

    let content = extract_content(html);
    let orphan = content
        .sections
        .iter()
        .find(|s| s.section_type == SectionType::Orphan)
        .expect("orphan section");
    assert_eq!(
        orphan.content["text"],
        FieldValue::Text("Loose paragraph the layout forgot about".to_string())
    );
}

#[test]
fn nested_claimed_content_is_not_duplicated() {
    let html = r#"
        <body>
          <main>
            <section id="inner"><p>Only once</p></section>
          </main>
        </body>
    "#;

    let content = extract_content(html);
    assert_eq!(content.sections.len(), 1);
    assert_eq!(content.sections[0].section_type, SectionType::Main);
}

#[test]
fn ids_are_stable_across_repeated_extraction() {
    let html = r#"
        <body>
          <header><h1>A</h1></header>
          <section><p>B</p></section>
          <section><p>C</p></section>
        </body>
    "#;

    let first = extract_content(html);
    let second = extract_content(html);
    let ids = |c: &sitepatch::WebsiteContent| -> Vec<String> {
        c.sections.iter().map(|s| s.id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn explicit_type_override_wins() {
    let html = r#"<body><section data-section-type="contact"><p>Email us</p></section></body>"#;
    let content = extract_content(html);
    assert_eq!(content.sections[0].section_type, SectionType::Contact);
}

#[test]
fn assets_are_collected_without_duplicates() {
    let html = r#"
        <body>
          <img src="/a.png" alt="a"><img src="/a.png" alt="again">
          <a href="/home">Home</a><a href="/home">Home</a>
        </body>
    "#;

    let content = extract_content(html);
    assert_eq!(content.assets.images, vec!["/a.png".to_string()]);
    assert_eq!(content.assets.links.len(), 1);
}

#[test]
fn hero_and_content_pair_extracts_to_two_sections() {
    let html = r#"
        <body>
          <header><h1>Site</h1><p>Tagline</p></header>
          <section><h2>Why</h2><p>Because it works.</p></section>
        </body>
    "#;

    let content = extract_content(html);
    assert_eq!(content.sections.len(), 2);

    let hero = &content.sections[0];
    assert_eq!(hero.section_type, SectionType::Hero);
    assert_eq!(hero.content["heading"], FieldValue::Text("Site".to_string()));
    assert_eq!(
        hero.content["paragraphs"],
        FieldValue::TextList(vec!["Tagline".to_string()])
    );

    let why = &content.sections[1];
    assert_eq!(why.section_type, SectionType::Content);
    assert_eq!(why.content["heading"], FieldValue::Text("Why".to_string()));
}

#[test]
fn visible_text_fragments_all_land_in_some_section() {
    let html = r#"
        <body>
          <header><h1>Masthead</h1></header>
          <nav><a href="/pricing">Pricing link</a></nav>
          <section><h2>Feature heading</h2><p>Feature paragraph</p>
            <ul><li>List item one</li></ul></section>
          <div><span>Loose orphan words</span></div>
          <footer><p>Footer legal line</p></footer>
          <script>var hidden = "never extracted";</script>
        </body>
    "#;

    let content = extract_content(html);
    let serialized = serde_json::to_string(&content.sections).unwrap();
    for fragment in [
        "Masthead",
        "Pricing link",
        "Feature heading",
        "Feature paragraph",
        "List item one",
        "Loose orphan words",
        "Footer legal line",
    ] {
        assert!(serialized.contains(fragment), "missing: {fragment}");
    }
    assert!(!serialized.contains("never extracted"));
}

#[test]
fn garbage_input_degrades_to_placeholder_not_panic() {
    let content = extract_content("");
    assert_eq!(content.metadata.title, "Extraction Failed");
    assert!(content.sections.is_empty());
}

#[test]
fn byte_entry_point_handles_legacy_encodings() {
    let html: &[u8] =
        b"<html><head><meta charset=\"ISO-8859-1\"><title>Caf\xE9</title></head><body><p>Caf\xE9 hours</p></body></html>";
    let content = extract_content_bytes(html);
    assert_eq!(content.metadata.title, "Caf\u{e9}");
}
