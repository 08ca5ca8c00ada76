//! Enrichment of discovered series with external metadata and artwork.
//!
//! The [`Enricher`] resolves a heuristic title (plus year hint) to canonical
//! series details through the [`ProviderRegistry`], optionally pulls episode
//! listings for the seasons present on disk, and materializes artwork through
//! the [`ImageService`]. Enrichment never fails: any lookup problem yields an
//! [`EnrichedSeries`] flagged as not enriched that still carries everything
//! the walker found.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use vidshelf_common::ImageCategory;

use super::provider::EpisodeMetadata;
use super::registry::{ProviderRegistry, SeriesMatch};
use crate::images::ImageService;
use crate::scanner::DiscoveredSeries;

/// Concurrent still downloads per series.
const STILL_CONCURRENCY: usize = 4;

/// Provider-sourced details for one episode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedEpisode {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub rating: Option<f64>,
    pub still_url: Option<String>,
    pub still_path: Option<PathBuf>,
    pub cast: Vec<String>,
}

/// A discovered series plus whatever enrichment could add.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    /// Walker output, untouched.
    pub discovered: DiscoveredSeries,
    /// False when the lookup failed or found nothing.
    pub enriched: bool,
    pub provider: Option<String>,
    pub canonical_id: Option<String>,
    /// Canonical title when enriched, else the heuristic title.
    pub title: String,
    pub year: Option<u16>,
    pub synopsis: Option<String>,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub poster_path: Option<PathBuf>,
    pub backdrop_url: Option<String>,
    pub backdrop_path: Option<PathBuf>,
    /// Provider episode counts keyed by season number.
    pub season_totals: BTreeMap<u32, u32>,
    pub season_synopses: BTreeMap<u32, String>,
    /// Episode details keyed by (season, episode).
    pub episodes: BTreeMap<(u32, u32), EnrichedEpisode>,
}

impl EnrichedSeries {
    /// Wrap walker output without any metadata.
    pub fn unenriched(discovered: DiscoveredSeries) -> Self {
        Self {
            title: discovered.title.clone(),
            year: discovered.year_hint,
            discovered,
            enriched: false,
            provider: None,
            canonical_id: None,
            synopsis: None,
            cast: Vec::new(),
            genres: Vec::new(),
            rating: None,
            poster_url: None,
            poster_path: None,
            backdrop_url: None,
            backdrop_path: None,
            season_totals: BTreeMap::new(),
            season_synopses: BTreeMap::new(),
            episodes: BTreeMap::new(),
        }
    }

    pub fn episode(&self, season: u32, episode: u32) -> Option<&EnrichedEpisode> {
        self.episodes.get(&(season, episode))
    }
}

/// Resolves discovered series to canonical metadata.
pub struct Enricher {
    registry: Arc<ProviderRegistry>,
    images: Option<ImageService>,
    episode_details: bool,
}

impl Enricher {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            images: None,
            episode_details: true,
        }
    }

    /// An enricher without providers. Every series comes back unenriched.
    pub fn disabled() -> Self {
        Self::new(Arc::new(ProviderRegistry::new()))
    }

    /// Download artwork through `images`.
    pub fn with_images(mut self, images: ImageService) -> Self {
        self.images = Some(images);
        self
    }

    /// True when at least one provider can be queried.
    pub fn is_enabled(&self) -> bool {
        self.registry.primary().is_some()
    }

    /// Whether per-season episode listings are fetched.
    pub fn with_episode_details(mut self, enabled: bool) -> Self {
        self.episode_details = enabled;
        self
    }

    /// Enrich one series.
    ///
    /// With `locked_id` the series details are fetched by that id and no
    /// title search happens.
    pub async fn enrich(&self, series: DiscoveredSeries, locked_id: Option<&str>) -> EnrichedSeries {
        if self.registry.primary().is_none() {
            debug!(title = %series.title, "No metadata provider available");
            return EnrichedSeries::unenriched(series);
        }

        match self.resolve(&series, locked_id).await {
            Ok(Some(found)) => self.apply(series, found).await,
            Ok(None) => {
                info!(
                    title = %series.title,
                    year = ?series.year_hint,
                    "No metadata match, keeping folder title"
                );
                EnrichedSeries::unenriched(series)
            }
            Err(e) => {
                warn!(
                    title = %series.title,
                    path = %series.root_path.display(),
                    error = %format!("{e:#}"),
                    "Metadata lookup failed"
                );
                EnrichedSeries::unenriched(series)
            }
        }
    }

    async fn resolve(
        &self,
        series: &DiscoveredSeries,
        locked_id: Option<&str>,
    ) -> Result<Option<SeriesMatch>> {
        match locked_id {
            Some(id) => {
                debug!(title = %series.title, canonical_id = id, "Using assigned canonical id");
                self.registry.fetch_series(id).await.map(Some)
            }
            None => self.registry.lookup(&series.title, series.year_hint).await,
        }
    }

    async fn apply(&self, discovered: DiscoveredSeries, found: SeriesMatch) -> EnrichedSeries {
        let SeriesMatch { provider, metadata } = found;
        let mut out = EnrichedSeries::unenriched(discovered);

        out.enriched = true;
        out.provider = Some(provider.to_string());
        out.canonical_id = Some(metadata.canonical_id.clone());
        if !metadata.title.trim().is_empty() {
            out.title = metadata.title.clone();
        }
        out.year = metadata.year.or(out.discovered.year_hint);
        out.synopsis = metadata.overview.clone();
        out.cast = metadata.cast.clone();
        out.genres = metadata.genres.clone();
        out.rating = metadata.community_rating;
        out.poster_url = metadata.poster_url.clone();
        out.backdrop_url = metadata.backdrop_url.clone();

        for season in &metadata.seasons {
            if season.episode_count > 0 {
                out.season_totals.insert(season.number, season.episode_count);
            }
            if let Some(overview) = &season.overview {
                out.season_synopses.insert(season.number, overview.clone());
            }
        }

        info!(
            path = %out.discovered.root_path.display(),
            title = %out.title,
            provider,
            canonical_id = %metadata.canonical_id,
            "Series enriched"
        );

        if self.episode_details {
            self.attach_episodes(&mut out, provider, &metadata.canonical_id)
                .await;
        }
        if let Some(images) = &self.images {
            fetch_artwork(images, &mut out, provider, &metadata.canonical_id).await;
        }

        out
    }

    async fn attach_episodes(&self, out: &mut EnrichedSeries, provider: &str, id: &str) {
        let seasons: Vec<u32> = out.discovered.seasons.iter().map(|s| s.number).collect();

        let listings = futures::future::join_all(seasons.iter().map(|&season| async move {
            (
                season,
                self.registry.season_episodes(provider, id, season).await,
            )
        }))
        .await;

        for (season, listing) in listings {
            let episodes = match listing {
                Ok(episodes) => episodes,
                Err(e) => {
                    warn!(
                        title = %out.title,
                        season,
                        error = %format!("{e:#}"),
                        "Season lookup failed"
                    );
                    continue;
                }
            };

            let listed = episodes.len() as u32;
            let total = out.season_totals.entry(season).or_insert(0);
            *total = (*total).max(listed);

            for episode in episodes {
                let number = episode.number;
                out.episodes.insert((season, number), to_enriched(episode));
            }
        }
    }
}

fn to_enriched(episode: EpisodeMetadata) -> EnrichedEpisode {
    EnrichedEpisode {
        title: episode.title,
        synopsis: episode.overview,
        rating: episode.rating,
        still_url: episode.still_url,
        still_path: None,
        cast: episode.guest_stars,
    }
}

async fn fetch_artwork(images: &ImageService, out: &mut EnrichedSeries, provider: &str, id: &str) {
    let owner = format!("{provider}-{id}");

    let poster = async {
        match out.poster_url.as_deref() {
            Some(url) => images.fetch(&owner, ImageCategory::Poster, url).await,
            None => None,
        }
    };
    let backdrop = async {
        match out.backdrop_url.as_deref() {
            Some(url) => images.fetch(&owner, ImageCategory::Backdrop, url).await,
            None => None,
        }
    };
    let (poster_path, backdrop_path) = futures::join!(poster, backdrop);
    out.poster_path = poster_path;
    out.backdrop_path = backdrop_path;

    // Stills only for episodes that exist on disk.
    let wanted: Vec<((u32, u32), String)> = out
        .discovered
        .seasons
        .iter()
        .flat_map(|s| s.episodes.iter().map(move |e| (s.number, e.number)))
        .filter_map(|key| {
            let url = out.episodes.get(&key)?.still_url.clone()?;
            Some((key, url))
        })
        .collect();

    let stills: Vec<((u32, u32), Option<PathBuf>)> = stream::iter(wanted)
        .map(|((season, episode), url)| {
            let still_id = format!("{owner}-s{season}e{episode}");
            async move {
                let path = images.fetch(&still_id, ImageCategory::Still, &url).await;
                ((season, episode), path)
            }
        })
        .buffer_unordered(STILL_CONCURRENCY)
        .collect()
        .await;

    for (key, path) in stills {
        if let Some(episode) = out.episodes.get_mut(&key) {
            episode.still_path = path;
        }
    }
}
