//! Walker output and walk policy types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output of one directory walk.
///
/// Serialized as-is into the scan cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root the walk started from.
    pub root: PathBuf,
    /// Discovered series, ordered by root path.
    pub series: Vec<DiscoveredSeries>,
    /// Subtrees that could not be read and were skipped.
    #[serde(default)]
    pub skipped: Vec<PathBuf>,
}

impl ScanResult {
    pub fn episode_count(&self) -> usize {
        self.series.iter().map(DiscoveredSeries::episode_count).sum()
    }
}

/// A provisional series found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredSeries {
    /// Heuristically cleaned title.
    pub title: String,
    /// Series root directory.
    pub root_path: PathBuf,
    /// Trailing `(YYYY)` from the root folder name.
    pub year_hint: Option<u16>,
    /// Seasons in ascending number order.
    pub seasons: Vec<DiscoveredSeason>,
}

impl DiscoveredSeries {
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredSeason {
    /// Positive season number.
    pub number: u32,
    /// Episodes in ascending number order.
    pub episodes: Vec<DiscoveredEpisode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEpisode {
    /// Positive episode number, parsed or assigned in name order.
    pub number: u32,
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    /// Estimate from size and resolution tag.
    pub duration_minutes: u32,
}

/// What to do with a second file claiming an episode number already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// First file in name order wins.
    #[default]
    KeepFirst,
    /// Last file in name order wins.
    KeepLast,
}

/// What to do with video files sitting next to season folders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LooseFilePolicy {
    /// Add them to the season encoded in their name, else season 1.
    #[default]
    FoldIntoSeasons,
    /// Skip them.
    Ignore,
}

/// Knobs for the directory walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkPolicy {
    /// Hard recursion backstop.
    pub max_depth: usize,
    /// Video extensions accepted in addition to the built-in list.
    pub extra_extensions: Vec<String>,
    pub duplicate_episodes: DuplicatePolicy,
    pub loose_files: LooseFilePolicy,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        Self {
            max_depth: 10,
            extra_extensions: Vec::new(),
            duplicate_episodes: DuplicatePolicy::default(),
            loose_files: LooseFilePolicy::default(),
        }
    }
}
