use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use catalog_core::{sanitize_filename, sanitize_product_filename, Cart, Item};
use catalog_logging::{catalog_error, catalog_info, LogContext};
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

pub const CSV_HEADER: [&str; 5] = ["Name", "Category", "Price", "Description", "Image Path"];
pub const CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("collection is empty, nothing to export")]
    EmptyCollection,
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer error: {0}")]
    CsvBuffer(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Yaml,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Yaml => "yml",
        }
    }

    /// File body for one item.
    pub fn render(self, item: &Item) -> Result<String, ExportError> {
        match self {
            ExportFormat::Text => Ok(render_text(item)),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(item)? + "\n"),
            ExportFormat::Csv => render_csv(item),
            ExportFormat::Yaml => Ok(serde_yaml::to_string(item)?),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("unknown export format `{other}` (text, json, csv, yaml)")),
        }
    }
}

fn render_text(item: &Item) -> String {
    let price = item.price();
    let symbol = if price.parse::<f64>().is_ok_and(f64::is_finite) {
        CURRENCY_SYMBOL
    } else {
        ""
    };
    format!(
        "Name: {}\nPrice: {}{}\nCategory: {}\nDescription: {}\n",
        item.name(),
        symbol,
        price,
        item.category(),
        item.description()
    )
}

fn render_csv(item: &Item) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    writer.write_record([
        item.name(),
        item.category(),
        item.price(),
        item.description(),
        item.image_path(),
    ])?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::CsvBuffer(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::CsvBuffer(err.to_string()))
}

/// Where an item's artifacts live: `<root>/<category dir>/<base name>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportTarget {
    pub category_dir: String,
    pub base_name: String,
}

impl ExportTarget {
    pub fn for_item(item: &Item) -> Self {
        Self {
            category_dir: sanitize_filename(item.category()),
            base_name: sanitize_filename(item.name()),
        }
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.category_dir)
    }

    pub fn filename(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.base_name, format.extension())
    }

    pub fn path(&self, root: &Path, format: ExportFormat) -> PathBuf {
        self.dir(root).join(self.filename(format))
    }
}

/// Write a single item in one format.
pub fn export_item(item: &Item, root: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
    write_target(item, &ExportTarget::for_item(item), root, format)
}

fn write_target(
    item: &Item,
    target: &ExportTarget,
    root: &Path,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let body = format.render(item)?;
    let writer = AtomicFileWriter::new(target.dir(root));
    Ok(writer.write(&target.filename(format), body)?)
}

#[derive(Debug)]
pub struct ExportFailure {
    pub item_name: String,
    pub error: ExportError,
}

#[derive(Debug)]
pub struct ExportReport {
    pub format: ExportFormat,
    pub written: Vec<PathBuf>,
    pub failed: Vec<ExportFailure>,
    /// Items written under a suffixed name because their base name was taken.
    pub renamed: usize,
}

impl ExportReport {
    fn new(format: ExportFormat) -> Self {
        Self {
            format,
            written: Vec::new(),
            failed: Vec::new(),
            renamed: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every item of `cart` in `format`, one file per item.
///
/// An empty cart is reported as [`ExportError::EmptyCollection`] without any
/// filesystem access. A failing item is logged and recorded; the rest of the
/// batch is still written. Items whose (category, name) sanitize to a target
/// already used in this call get a `_2`, `_3`, ... suffix.
pub fn export_items(
    cart: &Cart,
    root: &Path,
    format: ExportFormat,
    log: &LogContext,
) -> Result<ExportReport, ExportError> {
    if cart.is_empty() {
        catalog_info!(log, "Nothing to export as {}: the cart is empty", format);
        return Err(ExportError::EmptyCollection);
    }

    let mut report = ExportReport::new(format);
    let mut used = HashSet::new();
    for item in cart {
        let target = unique_target(ExportTarget::for_item(item), &mut used);
        if target.base_name != sanitize_filename(item.name()) {
            report.renamed += 1;
            catalog_error!(
                log,
                "Filename collision for '{}' in {}: writing as {}",
                item.name(),
                target.category_dir,
                target.filename(format)
            );
        }
        match write_target(item, &target, root, format) {
            Ok(path) => report.written.push(path),
            Err(error) => {
                catalog_error!(
                    log,
                    "Failed to export '{}' as {}: {}",
                    item.name(),
                    format,
                    error
                );
                report.failed.push(ExportFailure {
                    item_name: item.name().to_string(),
                    error,
                });
            }
        }
    }
    catalog_info!(
        log,
        "Exported {} of {} items as {} into {:?}",
        report.written.len(),
        cart.len(),
        format,
        root
    );
    Ok(report)
}

fn unique_target(mut target: ExportTarget, used: &mut HashSet<ExportTarget>) -> ExportTarget {
    let base = target.base_name.clone();
    let mut counter = 1;
    while used.contains(&target) {
        counter += 1;
        target.base_name = format!("{base}_{counter}");
    }
    used.insert(target.clone());
    target
}

/// Cart-level export operations.
pub trait CartExport {
    fn export_as(
        &self,
        format: ExportFormat,
        root: &Path,
        log: &LogContext,
    ) -> Result<ExportReport, ExportError>;

    fn export_as_text(&self, root: &Path, log: &LogContext) -> Result<ExportReport, ExportError> {
        self.export_as(ExportFormat::Text, root, log)
    }

    fn export_as_json(&self, root: &Path, log: &LogContext) -> Result<ExportReport, ExportError> {
        self.export_as(ExportFormat::Json, root, log)
    }

    fn export_as_csv(&self, root: &Path, log: &LogContext) -> Result<ExportReport, ExportError> {
        self.export_as(ExportFormat::Csv, root, log)
    }

    fn export_as_yaml(&self, root: &Path, log: &LogContext) -> Result<ExportReport, ExportError> {
        self.export_as(ExportFormat::Yaml, root, log)
    }

    /// Each format in turn; stops only on an empty collection.
    fn export_all(
        &self,
        formats: &[ExportFormat],
        root: &Path,
        log: &LogContext,
    ) -> Result<Vec<ExportReport>, ExportError> {
        formats
            .iter()
            .map(|format| self.export_as(*format, root, log))
            .collect()
    }
}

impl CartExport for Cart {
    fn export_as(
        &self,
        format: ExportFormat,
        root: &Path,
        log: &LogContext,
    ) -> Result<ExportReport, ExportError> {
        export_items(self, root, format, log)
    }
}

/// Payload for the single-product YAML file. The category picks the directory
/// and is not written into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFile {
    #[serde(skip)]
    pub category: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub media: String,
}

/// Write `<yaml_root>/products/<category>/<name>.yaml`.
pub fn create_product_file(yaml_root: &Path, product: &ProductFile) -> Result<PathBuf, ExportError> {
    let dir = yaml_root
        .join("products")
        .join(sanitize_filename(&product.category));
    let body = serde_yaml::to_string(product)?;
    let writer = AtomicFileWriter::new(dir);
    Ok(writer.write(&sanitize_product_filename(&product.name), body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prefixes_currency_only_for_bare_amounts() {
        let bare = Item::builder().name("A").price("19.99").build();
        assert!(render_text(&bare).contains("Price: $19.99\n"));

        let scraped = Item::builder().name("A").price("$25.99").build();
        assert!(render_text(&scraped).contains("Price: $25.99\n"));

        let euro = Item::builder().name("A").price("25,99 €").build();
        assert!(render_text(&euro).contains("Price: 25,99 €\n"));

        let range = Item::builder().name("A").price("10 - 12").build();
        assert!(render_text(&range).contains("Price: 10 - 12\n"));
    }

    #[test]
    fn text_has_four_lines() {
        let item = Item::builder().name("A").price("1.00").category("C").build();
        let text = render_text(&item);
        assert_eq!(
            text,
            "Name: A\nPrice: $1.00\nCategory: C\nDescription: No description available\n"
        );
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let item = Item::builder()
            .name("Vitamin D, 60 tabs")
            .price("9.99")
            .category("Vitamins")
            .build();
        let csv = render_csv(&item).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Name,Category,Price,Description,Image Path"));
        assert_eq!(
            lines.next(),
            Some("\"Vitamin D, 60 tabs\",Vitamins,9.99,No description available,No image available")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("YML".parse::<ExportFormat>(), Ok(ExportFormat::Yaml));
        assert_eq!("txt".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn collision_suffix_skips_taken_names() {
        let mut used = HashSet::new();
        let target = |name: &str| ExportTarget {
            category_dir: "tools".into(),
            base_name: name.into(),
        };
        assert_eq!(unique_target(target("widget"), &mut used).base_name, "widget");
        assert_eq!(unique_target(target("widget_2"), &mut used).base_name, "widget_2");
        assert_eq!(unique_target(target("widget"), &mut used).base_name, "widget_3");
    }
}
