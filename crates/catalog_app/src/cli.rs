use std::path::PathBuf;

use catalog_engine::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Scrape product pages and export them as text, JSON, CSV and YAML.
#[derive(Parser, Debug)]
#[command(name = "catalog_scraper", version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for app.log and error.log (overrides the config file)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl the configured start page and export every valid product
    Crawl(CrawlArgs),
    /// Export generated demo products
    Demo(DemoArgs),
    /// Write a single product YAML file
    Product(ProductArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "config/scraper.yml")]
    pub config: PathBuf,

    /// Output root (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format, repeatable: text, json, csv, yaml
    #[arg(short = 'f', long = "format")]
    pub formats: Vec<ExportFormat>,

    /// Links processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Skip product image downloads
    #[arg(long)]
    pub no_images: bool,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of products to generate
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output root
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Export format, repeatable: text, json, csv, yaml
    #[arg(short = 'f', long = "format")]
    pub formats: Vec<ExportFormat>,
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub name: String,

    /// Numeric price, stored with two decimals
    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Path or url of the product image
    #[arg(long, default_value = "")]
    pub media: String,

    /// Root under which `products/<category>/` is created
    #[arg(long, default_value = "output")]
    pub yaml_root: PathBuf,
}
