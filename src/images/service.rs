//! Image download service.
//!
//! Fetches remote artwork into an [`ImageStore`]. Failures never propagate:
//! they are logged and reported as a missing local path.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use vidshelf_common::ImageCategory;

use super::storage::ImageStore;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads artwork and hands it to an [`ImageStore`].
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    client: reqwest::Client,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self { store, client }
    }

    /// Make sure the image for `id`/`category` is stored locally.
    ///
    /// An existing file is returned without touching the network. Download,
    /// decode and write failures are logged and yield `None`.
    pub async fn fetch(&self, id: &str, category: ImageCategory, url: &str) -> Option<PathBuf> {
        if self.store.exists(id, category) {
            debug!(id, %category, "Image already stored");
            return Some(self.store.path_for(id, category));
        }

        match self.download_and_store(id, category, url).await {
            Ok(path) => {
                debug!(id, %category, path = %path.display(), "Image stored");
                Some(path)
            }
            Err(e) => {
                warn!(id, %category, url, error = %format!("{e:#}"), "Image download failed");
                None
            }
        }
    }

    async fn download_and_store(
        &self,
        id: &str,
        category: ImageCategory,
        url: &str,
    ) -> Result<PathBuf> {
        let data = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image from {url}"))?
            .error_for_status()
            .with_context(|| format!("HTTP error downloading image from {url}"))?
            .bytes()
            .await
            .with_context(|| format!("Failed to read image bytes from {url}"))?;

        let store = Arc::clone(&self.store);
        let id = id.to_string();
        tokio::task::spawn_blocking(move || store.save(&id, category, &data))
            .await
            .context("Image store task failed")?
    }
}
