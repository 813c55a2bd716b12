//! Catalog core: product items, the cart, filename rules and selector config.
//!
//! Nothing in this crate performs I/O beyond logging.
mod collection;
mod factory;
mod item;
mod sanitize;
mod selectors;

pub use collection::{Cart, Collection, CollectionError};
pub use factory::ItemFactory;
pub use item::{format_price, Field, Item, ItemBuilder, ItemPatch};
pub use sanitize::{sanitize_filename, sanitize_product_filename, FALLBACK_BASENAME};
pub use selectors::{ConfigError, SelectorConfig};
