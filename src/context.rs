//! Application context.
//!
//! [`AppContext`] wires the scan cache, enrichment, catalog and volumes from
//! a loaded [`Config`]. Every component is constructed here once and shared
//! through `Arc`s.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use tracing::{debug, info};
use vidshelf_db::pool::{init_pool, DbPool};

use crate::cache::ScanCache;
use crate::config::Config;
use crate::images::{FsImageStore, ImageService};
use crate::metadata::providers::TmdbProvider;
use crate::metadata::{Enricher, ProviderRegistry};
use crate::scanner::Walker;
use crate::sync::{ConfiguredVolumes, ScanOrchestrator, Synchronizer, VolumeProvider};

/// Upper bound on the cache TTL accepted from config (100 years).
const MAX_CACHE_TTL_HOURS: u64 = 24 * 365 * 100;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub pool: DbPool,
    pub cache: Arc<ScanCache>,
    pub enricher: Arc<Enricher>,
    pub sync: Arc<Synchronizer>,
    pub volumes: Arc<dyn VolumeProvider>,
}

impl AppContext {
    /// Open the catalog database under the data directory and build every
    /// component from `config`.
    pub fn open(config: Config) -> Result<Self> {
        let data_dir = config.resolved_data_dir();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let db_path = config.db_path();
        let pool = init_pool(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to open catalog database: {:?}", db_path))?;
        info!(path = %db_path.display(), "Catalog database opened");

        Ok(Self::with_pool(config, pool))
    }

    /// Build every component around an existing pool.
    pub fn with_pool(config: Config, pool: DbPool) -> Self {
        let ttl_hours = config.scan.cache_ttl_hours.min(MAX_CACHE_TTL_HOURS);
        let cache = ScanCache::new(Walker::new(config.walk_policy()))
            .with_disk_dir(config.cache_dir())
            .with_ttl(Duration::hours(ttl_hours as i64));
        debug!(ttl_hours = cache.ttl().num_hours(), "Scan cache configured");

        let enricher = build_enricher(&config);
        let volumes = ConfiguredVolumes::new(config.volumes.clone());

        Self {
            sync: Arc::new(Synchronizer::new(pool.clone())),
            cache: Arc::new(cache),
            enricher: Arc::new(enricher),
            volumes: Arc::new(volumes),
            config: Arc::new(config),
            pool,
        }
    }

    /// Replace the enricher, e.g. with one backed by a different registry.
    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Arc::new(enricher);
        self
    }

    pub fn with_volumes(mut self, volumes: Arc<dyn VolumeProvider>) -> Self {
        self.volumes = volumes;
        self
    }

    pub fn orchestrator(&self) -> ScanOrchestrator {
        ScanOrchestrator::new(
            Arc::clone(&self.volumes),
            Arc::clone(&self.cache),
            Arc::clone(&self.enricher),
            Arc::clone(&self.sync),
        )
    }
}

fn build_enricher(config: &Config) -> Enricher {
    let metadata = &config.metadata;
    let api_key = metadata
        .tmdb_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let Some(api_key) = api_key.filter(|_| metadata.enabled) else {
        debug!("Metadata enrichment disabled");
        return Enricher::disabled();
    };

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(TmdbProvider::new(
        api_key.to_string(),
        metadata.language.clone(),
    )));

    let mut enricher =
        Enricher::new(Arc::new(registry)).with_episode_details(metadata.episode_details);
    if metadata.download_images {
        let store = FsImageStore::new(config.images_dir());
        enricher = enricher.with_images(ImageService::new(Arc::new(store)));
    }
    enricher
}
