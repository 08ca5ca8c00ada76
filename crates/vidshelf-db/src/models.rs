//! Rust models matching the catalog schema.
//!
//! Each level is owned by exactly one parent: a `Season` belongs to one
//! `Series`, an `Episode` to one `Season`. User-owned state (`watched`,
//! `hidden`, a locked canonical id) lives on the rows and is preserved by the
//! synchronizer across rescans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vidshelf_common::{EpisodeId, SeasonId, SeriesId};

/// A television series rooted at one directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub id: SeriesId,
    pub volume_id: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    /// Series root directory; identity across rescans.
    pub hd_path: String,
    pub canonical_id: Option<String>,
    /// Set when the user assigned `canonical_id` by hand.
    pub canonical_id_locked: bool,
    pub synopsis: Option<String>,
    pub cast: Vec<String>,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_url: Option<String>,
    pub backdrop_path: Option<String>,
    pub enriched: bool,
    /// Cached "all episodes watched" flag, recomputed after writes.
    pub watched: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Series {
    /// Create an unenriched series with a fresh id.
    pub fn new(title: impl Into<String>, hd_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SeriesId::new(),
            volume_id: None,
            title: title.into(),
            year: None,
            hd_path: hd_path.into(),
            canonical_id: None,
            canonical_id_locked: false,
            synopsis: None,
            cast: Vec::new(),
            genres: Vec::new(),
            rating: None,
            poster_url: None,
            poster_path: None,
            backdrop_url: None,
            backdrop_path: None,
            enriched: false,
            watched: false,
            hidden: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A numbered season of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: SeasonId,
    pub series_id: SeriesId,
    pub number: i32,
    /// Provider-reported episode count, or `available_episodes` when unknown.
    pub total_episodes: i32,
    /// Episodes present in the catalog for this season.
    pub available_episodes: i32,
    pub synopsis: Option<String>,
    pub watched: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Season {
    pub fn new(series_id: SeriesId, number: i32) -> Self {
        let now = Utc::now();
        Self {
            id: SeasonId::new(),
            series_id,
            number,
            total_episodes: 0,
            available_episodes: 0,
            synopsis: None,
            watched: false,
            hidden: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single episode file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: EpisodeId,
    pub season_id: SeasonId,
    pub number: i32,
    pub title: Option<String>,
    pub file_path: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub duration_minutes: Option<i32>,
    pub synopsis: Option<String>,
    pub cast: Vec<String>,
    pub rating: Option<f64>,
    pub still_url: Option<String>,
    pub still_path: Option<String>,
    pub watched: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Episode {
    pub fn new(
        season_id: SeasonId,
        number: i32,
        file_path: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EpisodeId::new(),
            season_id,
            number,
            title: None,
            file_path: file_path.into(),
            file_name: file_name.into(),
            size_bytes: 0,
            duration_minutes: None,
            synopsis: None,
            cast: Vec::new(),
            rating: None,
            still_url: None,
            still_path: None,
            watched: false,
            hidden: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Series row plus aggregate counts, used for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub series: Series,
    pub season_count: i64,
    pub episode_count: i64,
    pub watched_count: i64,
}
