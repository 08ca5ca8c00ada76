//! Filesystem-level artwork storage.
//!
//! Images are stored once per (owner id, category) pair, independent of the
//! URL they came from, so an existing file short-circuits any download.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use vidshelf_common::ImageCategory;

/// Local artwork store.
pub trait ImageStore: Send + Sync {
    /// Where the image for `id`/`category` lives (or would live).
    fn path_for(&self, id: &str, category: ImageCategory) -> PathBuf;

    /// Whether an image for `id`/`category` is already stored.
    fn exists(&self, id: &str, category: ImageCategory) -> bool {
        self.path_for(id, category).is_file()
    }

    /// Decode `data` and store it, returning the local path.
    fn save(&self, id: &str, category: ImageCategory, data: &[u8]) -> Result<PathBuf>;
}

/// Filesystem store laid out as `{base_dir}/{id}/{category}.jpg`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    base_dir: PathBuf,
}

impl FsImageStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl ImageStore for FsImageStore {
    fn path_for(&self, id: &str, category: ImageCategory) -> PathBuf {
        self.base_dir
            .join(sanitize_id(id))
            .join(format!("{category}.jpg"))
    }

    fn save(&self, id: &str, category: ImageCategory, data: &[u8]) -> Result<PathBuf> {
        let img = image::load_from_memory(data).context("Failed to decode image data")?;

        let path = self.path_for(id, category);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create image directory: {}", dir.display()))?;

        // JPEG has no alpha channel.
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut buf, ImageFormat::Jpeg)
            .context("Failed to encode image as JPEG")?;

        let partial = path.with_extension("jpg.part");
        std::fs::write(&partial, buf.into_inner())
            .with_context(|| format!("Failed to write image file: {}", partial.display()))?;
        std::fs::rename(&partial, &path)
            .with_context(|| format!("Failed to move image into place: {}", path.display()))?;

        Ok(path)
    }
}

/// Keep ids usable as a single path component.
fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        _ => cleaned,
    }
}
