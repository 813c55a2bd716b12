use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::item::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required configuration key `{0}`")]
    Missing(&'static str),
    #[error("start page `{url}` is not an absolute http(s) url: {reason}")]
    InvalidStartPage { url: String, reason: String },
    #[error("selector `{key}` could not be parsed: {selector}")]
    InvalidSelector { key: &'static str, selector: String },
    #[error("could not read configuration {path}: {message}")]
    Read { path: String, message: String },
    #[error("could not parse configuration {path}: {message}")]
    Parse { path: String, message: String },
}

/// Start page plus one CSS selector per product field. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub start_page: String,
    pub product_name_selector: String,
    pub product_price_selector: String,
    pub product_category_selector: String,
    pub product_description_selector: String,
    pub product_image_selector: String,
}

impl SelectorConfig {
    /// Configuration key holding the selector for `field`.
    pub fn key_for(field: Field) -> &'static str {
        match field {
            Field::Name => "product_name_selector",
            Field::Price => "product_price_selector",
            Field::Description => "product_description_selector",
            Field::Category => "product_category_selector",
            Field::Image => "product_image_selector",
        }
    }

    pub fn selector(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.product_name_selector,
            Field::Price => &self.product_price_selector,
            Field::Description => &self.product_description_selector,
            Field::Category => &self.product_category_selector,
            Field::Image => &self.product_image_selector,
        }
    }

    /// Every key must be present and the start page must be an absolute
    /// http(s) url.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.start_page.trim().is_empty() {
            return Err(ConfigError::Missing("start_page"));
        }
        for field in Field::ALL {
            if self.selector(field).trim().is_empty() {
                return Err(ConfigError::Missing(Self::key_for(field)));
            }
        }
        self.start_url()
    }

    pub fn start_url(&self) -> Result<Url, ConfigError> {
        let raw = self.start_page.trim();
        let url = Url::parse(raw).map_err(|err| ConfigError::InvalidStartPage {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidStartPage {
                url: raw.to_string(),
                reason: format!("unsupported scheme {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SelectorConfig {
        SelectorConfig {
            start_page: "https://shop.example.com/catalog".into(),
            product_name_selector: "h1.title".into(),
            product_price_selector: ".price".into(),
            product_category_selector: ".breadcrumb li:last-child".into(),
            product_description_selector: "#description".into(),
            product_image_selector: "img.main".into(),
        }
    }

    #[test]
    fn complete_config_validates() {
        let url = complete().validate().unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/catalog");
    }

    #[test]
    fn missing_start_page_is_reported() {
        let config = SelectorConfig {
            start_page: " ".into(),
            ..complete()
        };
        assert_eq!(config.validate(), Err(ConfigError::Missing("start_page")));
    }

    #[test]
    fn missing_selector_names_its_key() {
        let config = SelectorConfig {
            product_price_selector: String::new(),
            ..complete()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing("product_price_selector"))
        );
    }

    #[test]
    fn relative_or_non_http_start_page_is_rejected() {
        for start in ["/catalog", "ftp://shop.example.com/"] {
            let config = SelectorConfig {
                start_page: start.into(),
                ..complete()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidStartPage { .. })
            ));
        }
    }
}
