use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The five product fields, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Price,
    Description,
    Category,
    Image,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Price,
        Field::Description,
        Field::Category,
        Field::Image,
    ];

    /// Key used in JSON/YAML output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Description => "description",
            Field::Category => "category",
            Field::Image => "image_path",
        }
    }

    /// Placeholder stored when no real value could be found.
    pub fn sentinel(self) -> &'static str {
        match self {
            Field::Name => "No name available",
            Field::Price => "No price available",
            Field::Description => "No description available",
            Field::Category => "No category available",
            Field::Image => "No image available",
        }
    }
}

/// Formats a numeric amount as the canonical price string (two decimals).
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}

/// One product. Every field is either real content or its [`Field::sentinel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    name: String,
    price: String,
    description: String,
    category: String,
    image_path: String,
}

impl Item {
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Description => &self.description,
            Field::Category => &self.category,
            Field::Image => &self.image_path,
        }
    }

    pub fn is_sentinel(&self, field: Field) -> bool {
        self.get(field) == field.sentinel()
    }

    /// Validity gate: a product needs a real name and a real price.
    pub fn is_valid(&self) -> bool {
        !self.is_sentinel(Field::Name) && !self.is_sentinel(Field::Price)
    }

    pub fn has_image(&self) -> bool {
        !self.is_sentinel(Field::Image)
    }

    /// Field map keyed by [`Field::key`].
    pub fn field_map(&self) -> BTreeMap<String, String> {
        Field::ALL
            .iter()
            .map(|field| (field.key().to_string(), self.get(*field).to_string()))
            .collect()
    }

    /// Replace the fields named in `patch`. Blank values become sentinels.
    pub fn update(&mut self, patch: ItemPatch) {
        let ItemPatch {
            name,
            price,
            description,
            category,
            image_path,
        } = patch;
        if let Some(value) = name {
            self.name = normalize(value, Field::Name);
        }
        if let Some(value) = price {
            self.price = normalize(value, Field::Price);
        }
        if let Some(value) = description {
            self.description = normalize(value, Field::Description);
        }
        if let Some(value) = category {
            self.category = normalize(value, Field::Category);
        }
        if let Some(value) = image_path {
            self.image_path = normalize(value, Field::Image);
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.name, self.price, self.category, self.description
        )
    }
}

fn normalize(value: String, field: Field) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        field.sentinel().to_string()
    } else if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Collects field values and produces an [`Item`]; unset fields become sentinels.
#[derive(Debug, Clone, Default)]
pub struct ItemBuilder {
    name: Option<String>,
    price: Option<String>,
    description: Option<String>,
    category: Option<String>,
    image_path: Option<String>,
}

impl ItemBuilder {
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn price(mut self, value: impl Into<String>) -> Self {
        self.price = Some(value.into());
        self
    }

    pub fn amount(self, amount: f64) -> Self {
        self.price(format_price(amount))
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(value.into());
        self
    }

    pub fn image_path(mut self, value: impl Into<String>) -> Self {
        self.image_path = Some(value.into());
        self
    }

    /// Set a field by its [`Field`] tag.
    pub fn field(self, field: Field, value: Option<String>) -> Self {
        let Some(value) = value else {
            return self;
        };
        match field {
            Field::Name => self.name(value),
            Field::Price => self.price(value),
            Field::Description => self.description(value),
            Field::Category => self.category(value),
            Field::Image => self.image_path(value),
        }
    }

    pub fn build(self) -> Item {
        let take = |value: Option<String>, field: Field| {
            normalize(value.unwrap_or_default(), field)
        };
        Item {
            name: take(self.name, Field::Name),
            price: take(self.price, Field::Price),
            description: take(self.description, Field::Description),
            category: take(self.category, Field::Category),
            image_path: take(self.image_path, Field::Image),
        }
    }
}

/// Replacement values for an [`Item::update`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_path: Option<String>,
}
