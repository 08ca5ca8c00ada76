//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait that series metadata
//! backends (TMDB, etc.) implement, along with the shared data types returned
//! by provider queries.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A single result returned from a series search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider-specific identifier for this series (e.g. TMDB numeric ID).
    pub id: String,
    /// Display title of the series.
    pub title: String,
    /// First-air year, if known.
    pub year: Option<u16>,
    /// Short synopsis / overview text.
    pub overview: Option<String>,
    /// How confident the provider is that this result matches the query (0.0 - 1.0).
    pub confidence: f64,
    /// Name of the provider that returned this result (e.g. "tmdb").
    pub provider_name: String,
    /// Fully-qualified poster URL, if available.
    pub poster_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Series details
// ---------------------------------------------------------------------------

/// Canonical metadata for a series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesMetadata {
    /// Provider-specific identifier, stored on the series as its canonical id.
    pub canonical_id: String,
    /// Localised title.
    pub title: String,
    /// Original-language title, if different from `title`.
    pub original_title: Option<String>,
    /// First-air year.
    pub year: Option<u16>,
    pub overview: Option<String>,
    /// Genre labels (e.g. "Drama").
    pub genres: Vec<String>,
    /// Main cast, billing order.
    pub cast: Vec<String>,
    /// Community / audience rating (typically 0.0 - 10.0).
    pub community_rating: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    /// Seasons as listed by the provider.
    pub seasons: Vec<SeasonSummary>,
    /// Map of external IDs keyed by source (e.g. `{"imdb": "tt0903747"}`).
    pub provider_ids: HashMap<String, String>,
}

/// Provider-side season listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub number: u32,
    /// Episodes the provider knows about, aired or announced.
    pub episode_count: u32,
    pub overview: Option<String>,
}

/// Provider-side episode details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    pub number: u32,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    /// Fully-qualified still image URL.
    pub still_url: Option<String>,
    pub guest_stars: Vec<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that all metadata providers must implement.
///
/// Each provider wraps a single external API and exposes a uniform interface
/// for searching series and fetching their details.
///
/// Providers are shared across tasks behind an `Arc`.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has been configured with valid
    /// credentials and is ready to serve requests.
    fn is_available(&self) -> bool;

    /// Search for series matching `title`, optionally constrained by the
    /// first-air `year`.
    ///
    /// Results are sorted by descending `confidence`.
    async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> anyhow::Result<Vec<SearchResult>>;

    /// Fetch full metadata for a series identified by `provider_id`.
    async fn get_series(&self, provider_id: &str) -> anyhow::Result<SeriesMetadata>;

    /// Fetch the episode listing of one season.
    async fn get_season_episodes(
        &self,
        provider_id: &str,
        season: u32,
    ) -> anyhow::Result<Vec<EpisodeMetadata>>;
}
