use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::fetch::Fetcher;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::FetchError;

pub const DEFAULT_MEDIA_DIR: &str = "media/products";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image url {0} has no file name")]
    NoFileName(String),
    #[error("image download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("image could not be saved: {0}")]
    Persist(#[from] PersistError),
    #[error("image write task failed: {0}")]
    Task(String),
}

/// Stores downloaded product images under one flat directory, named by the
/// last path segment of the image url.
#[derive(Debug, Clone)]
pub struct MediaStore {
    writer: AtomicFileWriter,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub async fn save_image(
        &self,
        fetcher: &dyn Fetcher,
        image_url: &str,
    ) -> Result<PathBuf, MediaError> {
        let filename = image_basename(image_url)
            .ok_or_else(|| MediaError::NoFileName(image_url.to_string()))?;
        let output = fetcher.fetch_bytes(image_url).await?;
        let writer = self.writer.clone();
        let path = tokio::task::spawn_blocking(move || writer.write(&filename, &output.bytes))
            .await
            .map_err(|err| MediaError::Task(err.to_string()))??;
        Ok(path)
    }
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_DIR)
    }
}

/// Last non-empty path segment of `image_url`, ignoring query and fragment.
pub fn image_basename(image_url: &str) -> Option<String> {
    let segment = match Url::parse(image_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string)),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    }?;
    let segment = segment.trim();
    if segment.is_empty() || segment == "." || segment == ".." {
        None
    } else {
        Some(segment.to_string())
    }
}
