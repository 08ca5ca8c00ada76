//! Catalog synchronization.
//!
//! - [`merge`] -- Merging enriched series into the catalog.
//! - [`orchestrator`] -- Running walk, enrichment and merge per volume.
//! - [`progress`] -- Progress events for callers.
//! - [`volumes`] -- Where scans look.
//!
//! Explicit user actions (watched, hidden, canonical id, delete) are methods
//! on [`Synchronizer`].

mod actions;
pub mod merge;
pub mod orchestrator;
pub mod progress;
pub mod volumes;

pub use merge::{PersistedSeries, Synchronizer};
pub use orchestrator::{ScanOptions, ScanOrchestrator, ScanOutcome, SeriesFailure, VolumeReport};
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use volumes::{ConfiguredVolumes, Volume, VolumeProvider};
