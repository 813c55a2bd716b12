use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_core::{ConfigError, SelectorConfig};
use catalog_engine::{ExportFormat, FetchSettings, DEFAULT_CONCURRENCY, DEFAULT_MEDIA_DIR};
use serde::Deserialize;

pub const START_PAGE_ENV: &str = "CATALOG_START_PAGE";

/// Resolved application configuration: defaults, then the YAML file, then
/// the environment, then command-line flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub yaml_root: PathBuf,
    pub media_dir: PathBuf,
    pub log_dir: PathBuf,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            yaml_root: PathBuf::from("output"),
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            log_dir: PathBuf::from("logs"),
            formats: ExportFormat::ALL.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub concurrency: usize,
    pub max_links: usize,
    pub download_images: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
            concurrency: DEFAULT_CONCURRENCY,
            max_links: 5_000,
            download_images: true,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(start) = lookup(START_PAGE_ENV).filter(|v| !v.trim().is_empty()) {
            self.selectors.start_page = start;
        }
    }

    pub fn formats(&self) -> Result<Vec<ExportFormat>, String> {
        self.output
            .formats
            .iter()
            .map(|name| name.parse::<ExportFormat>())
            .collect()
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.fetch.read_timeout_secs),
            ..FetchSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"
selectors:
  start_page: https://shop.example.com/catalog
  product_name_selector: h1.title
  product_price_selector: .price
  product_category_selector: .breadcrumb a
  product_description_selector: "#description"
  product_image_selector: img.main
output:
  output_dir: exports
  formats: [json, csv]
fetch:
  concurrency: 2
"##;

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.selectors.product_description_selector, "#description");
        assert_eq!(config.output.output_dir, PathBuf::from("exports"));
        assert_eq!(config.output.media_dir, PathBuf::from("media/products"));
        assert_eq!(config.fetch.concurrency, 2);
        assert_eq!(config.fetch.read_timeout_secs, 10);
        assert_eq!(
            config.formats().unwrap(),
            vec![ExportFormat::Json, ExportFormat::Csv]
        );
        assert!(config.selectors.validate().is_ok());
    }

    #[test]
    fn environment_overrides_start_page() {
        let mut config = AppConfig::parse(SAMPLE, Path::new("inline")).unwrap();
        config.apply_env(|key| {
            (key == START_PAGE_ENV).then(|| "https://other.example.com/".to_string())
        });
        assert_eq!(config.selectors.start_page, "https://other.example.com/");

        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.selectors.start_page, "https://other.example.com/");
    }

    #[test]
    fn missing_selectors_fail_validation() {
        let config = AppConfig::parse("output:\n  output_dir: x\n", Path::new("inline")).unwrap();
        assert_eq!(
            config.selectors.validate(),
            Err(ConfigError::Missing("start_page"))
        );
    }

    #[test]
    fn missing_file_and_bad_yaml_are_reported() {
        assert!(matches!(
            AppConfig::load(Path::new("/definitely/not/here.yml")),
            Err(ConfigError::Read { .. })
        ));
        assert!(matches!(
            AppConfig::parse("selectors: [", Path::new("inline")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut config = AppConfig::default();
        config.output.formats = vec!["xml".into()];
        assert!(config.formats().is_err());
    }
}
