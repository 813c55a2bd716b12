use catalog_core::{ConfigError, Field, Item, SelectorConfig};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Pulls the five product fields out of a page with one selector each.
///
/// Strict "match or sentinel": the first matching node is used, and a miss or
/// a blank value leaves the field at its sentinel. Fields are independent.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    name: Selector,
    price: Selector,
    description: Selector,
    category: Selector,
    image: Selector,
}

impl FieldExtractor {
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let parse = |field: Field| {
            let raw = config.selector(field);
            Selector::parse(raw).map_err(|_| ConfigError::InvalidSelector {
                key: SelectorConfig::key_for(field),
                selector: raw.to_string(),
            })
        };
        Ok(Self {
            name: parse(Field::Name)?,
            price: parse(Field::Price)?,
            description: parse(Field::Description)?,
            category: parse(Field::Category)?,
            image: parse(Field::Image)?,
        })
    }

    fn selector(&self, field: Field) -> &Selector {
        match field {
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Description => &self.description,
            Field::Category => &self.category,
            Field::Image => &self.image,
        }
    }

    /// Build a candidate item. A relative image `src` is resolved against
    /// `base` when one is given.
    pub fn extract(&self, document: &Html, base: Option<&Url>) -> Item {
        Field::ALL
            .iter()
            .fold(Item::builder(), |builder, field| {
                let node = document.select(self.selector(*field)).next();
                let value = node.and_then(|node| match field {
                    Field::Image => image_src(node, base),
                    _ => text_of(node),
                });
                builder.field(*field, value)
            })
            .build()
    }

    pub fn extract_html(&self, html: &str, base: Option<&Url>) -> Item {
        self.extract(&Html::parse_document(html), base)
    }
}

fn text_of(node: ElementRef<'_>) -> Option<String> {
    let text = node.text().collect::<String>();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn image_src(node: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let src = node.value().attr("src")?.trim();
    if src.is_empty() {
        return None;
    }
    let resolved = match base {
        Some(base) => base.join(src).map(String::from).ok(),
        None => None,
    };
    Some(resolved.unwrap_or_else(|| src.to_string()))
}
