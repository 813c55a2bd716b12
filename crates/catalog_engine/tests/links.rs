use catalog_engine::LinkDiscoverer;
use pretty_assertions::assert_eq;
use scraper::Html;
use url::Url;

fn base() -> Url {
    Url::parse("https://shop.example.com/catalog/").unwrap()
}

fn discover(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    LinkDiscoverer::new()
        .discover_in(&document, &base())
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn mailto_and_fragment_only_page_yields_nothing() {
    let html = r##"<a href="mailto:sales@example.com">Mail</a><a href="#top">Top</a>"##;
    assert!(discover(html).is_empty());
}

#[test]
fn relative_links_are_not_candidates() {
    let html = r#"<a href="/products/1">One</a><a href="./two">Two</a><a>No href</a>"#;
    assert!(discover(html).is_empty());
}

#[test]
fn absolute_links_are_deduplicated_in_first_seen_order() {
    let html = r#"
        <a href="https://shop.example.com/p/b">B</a>
        <a href="https://shop.example.com/p/a">A</a>
        <a href="https://shop.example.com/p/b">B again</a>
        <a href="http://other.example.org/x">X</a>
    "#;
    assert_eq!(
        discover(html),
        vec![
            "https://shop.example.com/p/b",
            "https://shop.example.com/p/a",
            "http://other.example.org/x",
        ]
    );
}

#[test]
fn resolution_normalizes_and_merges_equivalent_links() {
    let discoverer = LinkDiscoverer::new();
    let raw = vec![
        Some("HTTPS://Shop.Example.com"),
        None,
        Some("   "),
        Some("https://shop.example.com/"),
        Some("https://shop.example.com/a b"),
    ];
    let links: Vec<String> = discoverer
        .discover(raw, &base())
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(
        links,
        vec!["https://shop.example.com/", "https://shop.example.com/a%20b"]
    );
}

#[test]
fn link_cap_is_enforced() {
    let html = (0..5)
        .map(|i| format!(r#"<a href="https://ex.com/{i}">{i}</a>"#))
        .collect::<String>();
    let document = Html::parse_document(&html);
    let links = LinkDiscoverer::with_max_links(2).discover_in(&document, &base());
    assert_eq!(links.len(), 2);
    assert_eq!(links[1].as_str(), "https://ex.com/1");
}

#[test]
fn zero_cap_yields_no_links() {
    let links = LinkDiscoverer::with_max_links(0).discover([Some("https://a.example/x")], &base());
    assert!(links.is_empty());
}

#[test]
fn anchor_targets_keep_missing_hrefs() {
    let document = Html::parse_document(r#"<a href="x">x</a><a name="y">y</a>"#);
    assert_eq!(
        LinkDiscoverer::anchor_targets(&document),
        vec![Some("x".to_string()), None]
    );
}
