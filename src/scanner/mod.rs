//! Video collection scanner.
//!
//! This module turns a directory tree into provisional series, seasons and
//! episodes. Nothing here touches the catalog database or the network.
//!
//! - [`classifier`]: season folder and episode file name patterns
//! - [`title`]: series title cleanup and year hints
//! - [`duration`]: runtime estimate from file size
//! - [`walker`]: recursive traversal producing a [`ScanResult`]

pub mod classifier;
pub mod duration;
pub mod title;
pub mod types;
pub mod walker;

pub use classifier::{classify_episode_file, classify_season_folder, EpisodeMatch, SeasonMatch};
pub use title::{extract_series_title, extract_year_hint};
pub use types::{
    DiscoveredEpisode, DiscoveredSeason, DiscoveredSeries, DuplicatePolicy, LooseFilePolicy,
    ScanResult, WalkPolicy,
};
pub use walker::Walker;
