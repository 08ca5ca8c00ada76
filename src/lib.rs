//! Vidshelf - TV series cataloging across storage volumes
//!
//! This library crate exposes the scanner, cache, enrichment and catalog
//! synchronization used by the `vidshelf` binary and integration tests.

pub mod cache;
pub mod config;
pub mod context;
pub mod images;
pub mod metadata;
pub mod scanner;
pub mod sync;
