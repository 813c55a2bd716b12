use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;

use catalog_core::{Cart, Field, Item};
use catalog_logging::{catalog_debug, catalog_error, catalog_info, catalog_warn, LogContext};
use futures_util::future::{self, Either};
use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::extract::FieldExtractor;
use crate::fetch::Fetcher;
use crate::links::LinkDiscoverer;
use crate::media::MediaStore;
use crate::FetchError;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// What happened to the product image of an accepted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// No image to fetch, or image downloads are disabled.
    Skipped,
    Saved(PathBuf),
    Failed(String),
}

/// Terminal state of one candidate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Unavailable { url: Url, error: FetchError },
    Invalid { url: Url, item: Item },
    Valid { url: Url, item: Item, image: ImageOutcome },
}

/// Why a crawl ended before every candidate was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlStop {
    StartPageUnavailable(FetchError),
    NoCandidateLinks,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub items: Cart,
    pub candidates: usize,
    pub processed: usize,
    pub unavailable: usize,
    pub invalid: usize,
    pub images_saved: usize,
    pub stopped: Option<CrawlStop>,
}

impl CrawlReport {
    fn stopped(reason: CrawlStop) -> Self {
        Self {
            stopped: Some(reason),
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: LinkOutcome) {
        self.processed += 1;
        match outcome {
            LinkOutcome::Unavailable { .. } => self.unavailable += 1,
            LinkOutcome::Invalid { .. } => self.invalid += 1,
            LinkOutcome::Valid { item, image, .. } => {
                if matches!(image, ImageOutcome::Saved(_)) {
                    self.images_saved += 1;
                }
                self.items.add(item);
            }
        }
    }
}

/// Drives the crawl: start page, link discovery, then fetch / extract /
/// validate / image side-load for every candidate link.
pub struct ProductPageProcessor {
    fetcher: Arc<dyn Fetcher>,
    extractor: FieldExtractor,
    discoverer: LinkDiscoverer,
    media: Option<MediaStore>,
    concurrency: usize,
    log: LogContext,
}

impl ProductPageProcessor {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: FieldExtractor, log: LogContext) -> Self {
        Self {
            fetcher,
            extractor,
            discoverer: LinkDiscoverer::new(),
            media: Some(MediaStore::default()),
            concurrency: DEFAULT_CONCURRENCY,
            log,
        }
    }

    pub fn with_discoverer(mut self, discoverer: LinkDiscoverer) -> Self {
        self.discoverer = discoverer;
        self
    }

    pub fn with_media(mut self, media: MediaStore) -> Self {
        self.media = Some(media);
        self
    }

    pub fn without_images(mut self) -> Self {
        self.media = None;
        self
    }

    /// Number of links processed at once; `1` is strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Crawl from `start`. Never fails: an unavailable start page or an empty
    /// link set ends the crawl with zero items and a [`CrawlStop`] reason.
    /// Results keep link order regardless of concurrency.
    pub async fn crawl(&self, start: &Url, cancel: &CancellationToken) -> CrawlReport {
        catalog_info!(self.log, "Fetching start page {}", start);
        let start_page = match self.fetcher.fetch_page(start.as_str()).await {
            Ok(page) => page,
            Err(err) => {
                catalog_error!(self.log, "Start page {} is not available: {}", start, err);
                return CrawlReport::stopped(CrawlStop::StartPageUnavailable(err));
            }
        };

        let links = {
            let document = start_page.document();
            self.discoverer.discover_in(&document, &start_page.url)
        };
        if links.is_empty() {
            catalog_warn!(
                self.log,
                "No candidate links found on {}, nothing to crawl",
                start_page.url
            );
            return CrawlReport::stopped(CrawlStop::NoCandidateLinks);
        }
        catalog_info!(self.log, "Found {} candidate links", links.len());

        let mut report = CrawlReport {
            candidates: links.len(),
            ..CrawlReport::default()
        };
        let mut outcomes = stream::iter(links)
            .map(|url| self.process_unless_cancelled(url, cancel))
            .buffered(self.concurrency);
        while let Some(outcome) = outcomes.next().await {
            if let Some(outcome) = outcome {
                report.record(outcome);
            }
        }

        if report.processed < report.candidates && cancel.is_cancelled() {
            catalog_warn!(
                self.log,
                "Crawl cancelled after {} of {} links",
                report.processed,
                report.candidates
            );
            report.stopped = Some(CrawlStop::Cancelled);
        }
        catalog_info!(
            self.log,
            "Crawl finished: {} products, {} invalid, {} unavailable",
            report.items.len(),
            report.invalid,
            report.unavailable
        );
        report
    }

    /// Links not yet started when `cancel` fires are skipped and links in
    /// flight are abandoned. Outcomes that already finished are still
    /// yielded, in link order, by the surrounding `buffered` stream.
    async fn process_unless_cancelled(
        &self,
        url: Url,
        cancel: &CancellationToken,
    ) -> Option<LinkOutcome> {
        if cancel.is_cancelled() {
            return None;
        }
        let work = pin!(self.process_link(url));
        let cancelled = pin!(cancel.cancelled());
        match future::select(work, cancelled).await {
            Either::Left((outcome, _)) => Some(outcome),
            Either::Right(_) => None,
        }
    }

    /// Run one candidate link through the pipeline.
    pub async fn process_link(&self, url: Url) -> LinkOutcome {
        let page = match self.fetcher.fetch_page(url.as_str()).await {
            Ok(page) => page,
            Err(error) => {
                catalog_error!(self.log, "Skipping {}: {}", url, error);
                return LinkOutcome::Unavailable { url, error };
            }
        };

        let item = self.extractor.extract_html(&page.html, Some(&page.url));
        if !item.is_valid() {
            let missing: Vec<_> = [Field::Name, Field::Price]
                .into_iter()
                .filter(|field| item.is_sentinel(*field))
                .map(Field::key)
                .collect();
            catalog_error!(
                self.log,
                "Invalid product at {}: missing {}",
                url,
                missing.join(", ")
            );
            return LinkOutcome::Invalid { url, item };
        }

        catalog_debug!(self.log, "Accepted '{}' from {}", item.name(), url);
        let image = self.side_load_image(&item).await;
        LinkOutcome::Valid { url, item, image }
    }

    async fn side_load_image(&self, item: &Item) -> ImageOutcome {
        let Some(media) = &self.media else {
            return ImageOutcome::Skipped;
        };
        if !item.has_image() {
            return ImageOutcome::Skipped;
        }
        match media.save_image(self.fetcher.as_ref(), item.image_path()).await {
            Ok(path) => {
                catalog_debug!(self.log, "Saved image {:?}", path);
                ImageOutcome::Saved(path)
            }
            Err(err) => {
                catalog_error!(
                    self.log,
                    "Image {} for '{}' not saved: {}",
                    item.image_path(),
                    item.name(),
                    err
                );
                ImageOutcome::Failed(err.to_string())
            }
        }
    }
}
