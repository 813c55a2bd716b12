//! Catalog engine: fetching, extraction, crawl orchestration and export I/O.
mod decode;
mod export;
mod extract;
mod fetch;
mod links;
mod media;
mod persist;
mod processor;
mod types;

pub use decode::decode_page;
pub use export::{
    create_product_file, export_item, export_items, CartExport, ExportError, ExportFailure,
    ExportFormat, ExportReport, ExportTarget, ProductFile, CSV_HEADER, CURRENCY_SYMBOL,
};
pub use extract::FieldExtractor;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use links::LinkDiscoverer;
pub use media::{image_basename, MediaError, MediaStore, DEFAULT_MEDIA_DIR};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use processor::{
    CrawlReport, CrawlStop, ImageOutcome, LinkOutcome, ProductPageProcessor, DEFAULT_CONCURRENCY,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, Page};

pub use tokio_util::sync::CancellationToken;
