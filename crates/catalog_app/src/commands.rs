use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use catalog_core::{format_price, Cart, Field, ItemFactory};
use catalog_engine::{
    create_product_file, CancellationToken, CartExport, ExportError, ExportFormat, FieldExtractor,
    LinkDiscoverer, MediaStore, ProductFile, ProductPageProcessor, ReqwestFetcher,
};
use catalog_logging::{
    catalog_error, catalog_info, catalog_warn, LogContext, LogDestination, LogSetup,
};
use log::LevelFilter;

use crate::cli::{Cli, Command, CrawlArgs, DemoArgs, ProductArgs};
use crate::config::AppConfig;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match cli.command {
        Command::Crawl(args) => crawl(args, cli.log_dir, level),
        Command::Demo(args) => {
            init_logging(cli.log_dir, level);
            demo(args, &LogContext::facade())
        }
        Command::Product(args) => {
            init_logging(cli.log_dir, level);
            product(args, &LogContext::facade())
        }
    }
}

fn init_logging(log_dir: Option<PathBuf>, level: LevelFilter) {
    let destination = match log_dir {
        Some(dir) => LogDestination::Both(dir),
        None => LogDestination::Terminal,
    };
    catalog_logging::initialize(&LogSetup { destination, level });
}

fn crawl(args: CrawlArgs, log_dir: Option<PathBuf>, level: LevelFilter) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&args.config)?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(output) = args.output {
        config.output.output_dir = output;
    }
    if let Some(concurrency) = args.concurrency {
        config.fetch.concurrency = concurrency;
    }
    if args.no_images {
        config.fetch.download_images = false;
    }
    let formats = if args.formats.is_empty() {
        config.formats().map_err(|err| anyhow!(err))?
    } else {
        args.formats
    };
    let start = config.selectors.validate()?;
    let extractor = FieldExtractor::new(&config.selectors)?;

    init_logging(
        Some(log_dir.unwrap_or_else(|| config.output.log_dir.clone())),
        level,
    );
    let log = LogContext::facade();

    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch_settings())?);
    let processor = ProductPageProcessor::new(fetcher, extractor, log.clone())
        .with_discoverer(LinkDiscoverer::with_max_links(config.fetch.max_links))
        .with_concurrency(config.fetch.concurrency);
    let processor = if config.fetch.download_images {
        processor.with_media(MediaStore::new(&config.output.media_dir))
    } else {
        processor.without_images()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });
    let report = runtime.block_on(processor.crawl(&start, &cancel));

    if let Some(reason) = &report.stopped {
        catalog_warn!(log, "Crawl stopped early: {:?}", reason);
    }
    report.items.show_all_items(&log);
    export_cart(&report.items, &formats, &config.output.output_dir, &log);
    Ok(())
}

fn demo(args: DemoArgs, log: &LogContext) -> anyhow::Result<()> {
    let mut factory = match args.seed {
        Some(seed) => ItemFactory::seeded(seed),
        None => ItemFactory::new(),
    };
    let cart: Cart = factory.items(args.count).into_iter().collect();
    let formats = if args.formats.is_empty() {
        ExportFormat::ALL.to_vec()
    } else {
        args.formats
    };
    cart.show_all_items(log);
    export_cart(&cart, &formats, &args.output, log);
    Ok(())
}

fn product(args: ProductArgs, log: &LogContext) -> anyhow::Result<()> {
    let or_sentinel = |value: String, field: Field| {
        if value.trim().is_empty() {
            field.sentinel().to_string()
        } else {
            value
        }
    };
    let file = ProductFile {
        category: or_sentinel(args.category, Field::Category),
        name: or_sentinel(args.name, Field::Name),
        price: format_price(args.price),
        description: or_sentinel(args.description, Field::Description),
        media: or_sentinel(args.media, Field::Image),
    };
    let path = create_product_file(&args.yaml_root, &file)
        .with_context(|| format!("failed to write product file for '{}'", file.name))?;
    catalog_info!(log, "Wrote product file {:?}", path);
    Ok(())
}

/// Export in every requested format. An empty cart is reported once and is
/// not an error for the process.
fn export_cart(cart: &Cart, formats: &[ExportFormat], root: &Path, log: &LogContext) {
    match cart.export_all(formats, root, log) {
        Ok(reports) => {
            for report in reports.iter().filter(|r| !r.is_complete()) {
                catalog_error!(
                    log,
                    "{} of {} {} exports failed",
                    report.failed.len(),
                    report.failed.len() + report.written.len(),
                    report.format
                );
            }
        }
        Err(ExportError::EmptyCollection) => {
            catalog_warn!(log, "No products to export");
        }
        Err(err) => {
            catalog_error!(log, "Export failed: {}", err);
        }
    }
}
