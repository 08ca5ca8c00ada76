use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::{DuplicatePolicy, LooseFilePolicy, WalkPolicy};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Holds the catalog database, the scan cache and downloaded images.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub volumes: Vec<VolumeConfig>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.local/share/vidshelf")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            scan: ScanConfig::default(),
            metadata: MetadataConfig::default(),
            volumes: Vec::new(),
        }
    }
}

impl Config {
    /// `data_dir` with a leading `~` expanded.
    pub fn resolved_data_dir(&self) -> PathBuf {
        let raw = self.data_dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }

    pub fn db_path(&self) -> PathBuf {
        self.resolved_data_dir().join("vidshelf.db")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.resolved_data_dir().join("scan-cache")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.resolved_data_dir().join("images")
    }

    pub fn walk_policy(&self) -> WalkPolicy {
        WalkPolicy {
            max_depth: self.scan.max_depth,
            extra_extensions: self.scan.extra_extensions.clone(),
            duplicate_episodes: self.scan.duplicate_episodes,
            loose_files: self.scan.loose_files,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// How long a cached walk stays valid.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Recursion limit for the directory walker.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Video extensions accepted in addition to the built-in list.
    #[serde(default)]
    pub extra_extensions: Vec<String>,

    #[serde(default)]
    pub duplicate_episodes: DuplicatePolicy,

    #[serde(default)]
    pub loose_files: LooseFilePolicy,
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_max_depth() -> usize {
    10
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: default_cache_ttl_hours(),
            max_depth: default_max_depth(),
            extra_extensions: Vec::new(),
            duplicate_episodes: DuplicatePolicy::default(),
            loose_files: LooseFilePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub enabled: bool,

    /// TMDB v3 API key.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_true")]
    pub download_images: bool,

    /// Fetch per-season episode listings as well as series details.
    #[serde(default = "default_true")]
    pub episode_details: bool,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tmdb_api_key: None,
            language: default_language(),
            download_images: true,
            episode_details: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumeConfig {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub path: PathBuf,
}

impl VolumeConfig {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
