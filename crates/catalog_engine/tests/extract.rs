use catalog_core::{ConfigError, Field, SelectorConfig};
use catalog_engine::FieldExtractor;
use pretty_assertions::assert_eq;
use url::Url;

fn config() -> SelectorConfig {
    SelectorConfig {
        start_page: "https://shop.example.com/".into(),
        product_name_selector: "h1.product-title".into(),
        product_price_selector: "span.price".into(),
        product_category_selector: "nav.breadcrumb a.category".into(),
        product_description_selector: "div#description".into(),
        product_image_selector: "img.product-image".into(),
    }
}

const FULL_PAGE: &str = r#"
<html><body>
  <nav class="breadcrumb"><a class="category" href="/c/vitamins"> Vitamins </a></nav>
  <h1 class="product-title">
     Nutrilite™ Vitamin D
  </h1>
  <span class="price">$25.99</span>
  <span class="price">$99.99</span>
  <div id="description"><p>Supports <b>bone</b> health.</p></div>
  <img class="product-image" src="/media/vit-d.jpg">
</body></html>
"#;

#[test]
fn all_fields_are_extracted_and_trimmed() {
    let extractor = FieldExtractor::new(&config()).unwrap();
    let base = Url::parse("https://shop.example.com/p/vit-d").unwrap();
    let item = extractor.extract_html(FULL_PAGE, Some(&base));

    assert_eq!(item.name(), "Nutrilite™ Vitamin D");
    assert_eq!(item.price(), "$25.99");
    assert_eq!(item.category(), "Vitamins");
    assert_eq!(item.description(), "Supports bone health.");
    assert_eq!(item.image_path(), "https://shop.example.com/media/vit-d.jpg");
    assert!(item.is_valid());
}

#[test]
fn missing_price_node_gives_price_sentinel_only() {
    let html = r#"<h1 class="product-title">Widget</h1><div id="description">Nice</div>"#;
    let item = FieldExtractor::new(&config()).unwrap().extract_html(html, None);

    assert_eq!(item.name(), "Widget");
    assert_eq!(item.price(), "No price available");
    assert_eq!(item.description(), "Nice");
    assert!(item.is_sentinel(Field::Category));
    assert!(item.is_sentinel(Field::Image));
    assert!(!item.is_valid());
}

#[test]
fn blank_text_and_blank_src_are_misses() {
    let html = r#"<h1 class="product-title">   </h1><span class="price">$1</span><img class="product-image" src=" ">"#;
    let item = FieldExtractor::new(&config()).unwrap().extract_html(html, None);

    assert_eq!(item.name(), "No name available");
    assert_eq!(item.image_path(), "No image available");
}

#[test]
fn image_without_base_keeps_raw_src() {
    let html = r#"<img class="product-image" src="img/a.png">"#;
    let item = FieldExtractor::new(&config()).unwrap().extract_html(html, None);
    assert_eq!(item.image_path(), "img/a.png");
}

#[test]
fn unparsable_selector_is_a_config_error() {
    let broken = SelectorConfig {
        product_price_selector: "span[".into(),
        ..config()
    };
    let err = FieldExtractor::new(&broken).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidSelector {
            key: "product_price_selector",
            selector: "span[".into(),
        }
    );
}

#[test]
fn multi_paragraph_description_is_one_line() {
    let html = r#"<h1 class="product-title">Fish
  Oil</h1><span class="price">$12.00</span>
<div id="description">
<p>Line one.</p>
<p>Line two.</p>
</div>"#;
    let item = FieldExtractor::new(&config()).unwrap().extract_html(html, None);

    assert_eq!(item.name(), "Fish Oil");
    assert_eq!(item.description(), "Line one. Line two.");
}
