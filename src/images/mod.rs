//! Local artwork storage.
//!
//! Posters, backdrops and episode stills are downloaded once and kept on
//! disk under a per-owner, per-category file name.

mod service;
mod storage;

pub use service::ImageService;
pub use storage::{FsImageStore, ImageStore};
