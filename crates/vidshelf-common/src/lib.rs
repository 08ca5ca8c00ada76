//! Vidshelf-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across vidshelf:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for series, seasons and episodes
//! - **Core Types**: Image categories used by the artwork store
//! - **Path Utilities**: Functions to detect video files by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use vidshelf_common::{SeriesId, Error, Result};
//! use vidshelf_common::paths::is_video_file;
//! use std::path::Path;
//!
//! let series_id = SeriesId::new();
//!
//! assert!(is_video_file(Path::new("S01E01.mkv")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("series"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
