//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary data
//! directory, a temporary library directory registered as volume `hd`, and a
//! full [`AppContext`]. [`StubProvider`] stands in for an external metadata
//! service.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use vidshelf::config::{Config, VolumeConfig};
use vidshelf::context::AppContext;
use vidshelf::metadata::{
    EpisodeMetadata, Enricher, MetadataProvider, ProviderRegistry, SearchResult, SeasonSummary,
    SeriesMetadata,
};
use vidshelf::sync::{ProgressCallback, ProgressEvent};
use vidshelf_db::pool::{init_memory_pool, DbPool};

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub data_dir: TempDir,
    pub library: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a new harness, letting `customize` adjust the config first.
    pub fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let data_dir = tempfile::tempdir().expect("failed to create data dir");
        let library = tempfile::tempdir().expect("failed to create library dir");

        let mut config = Config {
            data_dir: data_dir.path().to_path_buf(),
            volumes: vec![VolumeConfig {
                id: "hd".into(),
                name: Some("Main HD".into()),
                path: library.path().to_path_buf(),
            }],
            ..Config::default()
        };
        customize(&mut config);

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::with_pool(config, db.clone());

        Self {
            ctx,
            db,
            data_dir,
            library,
        }
    }

    /// Swap in an enricher backed by `provider`.
    pub fn with_provider(mut self, provider: Arc<StubProvider>) -> Self {
        let mut registry = ProviderRegistry::new();
        registry.register(provider);
        self.ctx = self.ctx.with_enricher(Enricher::new(Arc::new(registry)));
        self
    }

    pub fn library_path(&self) -> &Path {
        self.library.path()
    }

    /// Create a video file under the library, with `size` bytes of content.
    pub fn add_file(&self, rel: &str, size: usize) -> PathBuf {
        let path = self.library.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, vec![0u8; size]).expect("failed to write file");
        path
    }

    /// Create a small video file under the library.
    pub fn add_episode(&self, rel: &str) -> PathBuf {
        self.add_file(rel, 16)
    }
}

/// Progress callback that records every event.
pub fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().push(event));
    (callback, events)
}

/// In-process metadata provider with canned answers.
pub struct StubProvider {
    /// Series returned for any search whose query equals the key
    /// (case-insensitive).
    pub catalog: Vec<SeriesMetadata>,
    /// Episodes per (canonical id, season).
    pub episodes: Vec<(String, u32, Vec<EpisodeMetadata>)>,
    pub searches: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(catalog: Vec<SeriesMetadata>) -> Self {
        Self {
            catalog,
            episodes: Vec::new(),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_episodes(mut self, id: &str, season: u32, episodes: Vec<EpisodeMetadata>) -> Self {
        self.episodes.push((id.to_string(), season, episodes));
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().len()
    }
}

/// Minimal series metadata for the stub catalog.
pub fn series_metadata(id: &str, title: &str, year: u16, seasons: &[(u32, u32)]) -> SeriesMetadata {
    SeriesMetadata {
        canonical_id: id.to_string(),
        title: title.to_string(),
        year: Some(year),
        overview: Some(format!("{title} overview")),
        genres: vec!["Drama".to_string()],
        cast: vec!["Lead Actor".to_string()],
        community_rating: Some(8.5),
        seasons: seasons
            .iter()
            .map(|&(number, episode_count)| SeasonSummary {
                number,
                episode_count,
                overview: None,
            })
            .collect(),
        ..SeriesMetadata::default()
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> anyhow::Result<Vec<SearchResult>> {
        self.searches.lock().push(title.to_string());
        Ok(self
            .catalog
            .iter()
            .filter(|s| {
                let needle = title.to_lowercase();
                s.title.to_lowercase().starts_with(&needle)
            })
            .map(|s| SearchResult {
                id: s.canonical_id.clone(),
                title: s.title.clone(),
                year: s.year,
                overview: s.overview.clone(),
                confidence: if year.is_some() && year == s.year { 0.8 } else { 0.5 },
                provider_name: "stub".to_string(),
                poster_url: None,
            })
            .collect())
    }

    async fn get_series(&self, provider_id: &str) -> anyhow::Result<SeriesMetadata> {
        self.catalog
            .iter()
            .find(|s| s.canonical_id == provider_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown series {provider_id}"))
    }

    async fn get_season_episodes(
        &self,
        provider_id: &str,
        season: u32,
    ) -> anyhow::Result<Vec<EpisodeMetadata>> {
        Ok(self
            .episodes
            .iter()
            .find(|(id, s, _)| id == provider_id && *s == season)
            .map(|(_, _, eps)| eps.clone())
            .unwrap_or_default())
    }
}
