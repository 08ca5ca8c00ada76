//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] for TV series by querying the TMDB v3 REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.
//! - Confidence scoring based on title similarity and year proximity.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metadata::provider::{
    EpisodeMetadata, MetadataProvider, SearchResult, SeasonSummary, SeriesMetadata,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: u32 = 4;
const MAX_CAST: usize = 10;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetail {
    id: u64,
    name: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    genres: Option<Vec<TmdbGenre>>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    seasons: Option<Vec<TmdbSeasonSummary>>,
    credits: Option<TmdbCredits>,
    external_ids: Option<TmdbExternalIds>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonSummary {
    season_number: u32,
    episode_count: Option<u32>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    cast: Vec<TmdbPerson>,
}

#[derive(Debug, Deserialize)]
struct TmdbPerson {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbExternalIds {
    imdb_id: Option<String>,
    tvdb_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonDetail {
    episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisode {
    episode_number: u32,
    name: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    still_path: Option<String>,
    #[serde(default)]
    guest_stars: Vec<TmdbPerson>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// Wraps the TMDB v3 REST API with built-in rate limiting, retry logic, and
/// confidence-scored search results.
///
/// # Examples
///
/// ```no_run
/// use vidshelf::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-api-key".into(), "en-US".into());
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
    image_base: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider with the given API key and language.
    ///
    /// The `language` parameter should be an ISO-639-1 language tag such as
    /// `"en-US"`. Rate limiting is configured at 4 requests per second.
    pub fn new(api_key: String, language: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Self {
            client,
            api_key,
            language,
            base_url: TMDB_BASE_URL.to_string(),
            image_base: TMDB_IMAGE_BASE.to_string(),
            rate_limiter,
        }
    }

    /// Point the provider at another API root and image root.
    pub fn with_base_urls(mut self, api: impl Into<String>, images: impl Into<String>) -> Self {
        self.base_url = api.into().trim_end_matches('/').to_string();
        self.image_base = images.into().trim_end_matches('/').to_string();
        self
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {}", self.redact(url)))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {}", self.redact(url)))?;

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url,
            urlencoded(&self.api_key),
            urlencoded(&self.language)
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    /// Hide the API key in logged URLs.
    fn redact(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            return url.to_string();
        }
        url.replace(&urlencoded(&self.api_key), "***")
    }

    /// Convert a TMDB image path fragment to a full URL.
    fn image_url(&self, path: &str) -> String {
        format!("{}{path}", self.image_base)
    }

    /// Compute confidence score for a search result based on title similarity
    /// and year proximity.
    fn confidence(
        query_title: &str,
        result_title: &str,
        query_year: Option<u16>,
        result_year: Option<u16>,
    ) -> f64 {
        let base = if query_title == result_title {
            0.5
        } else if query_title.eq_ignore_ascii_case(result_title) {
            0.4
        } else if result_title
            .to_ascii_lowercase()
            .contains(&query_title.to_ascii_lowercase())
        {
            0.2
        } else {
            0.1
        };

        let year_bonus = match (query_year, result_year) {
            (Some(q), Some(r)) if q == r => 0.3,
            (Some(q), Some(r)) if q.abs_diff(r) <= 1 => 0.15,
            _ => 0.0,
        };

        base + year_bonus
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: &Option<String>) -> Option<u16> {
    date.as_deref()
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse::<u16>().ok())
}

/// TMDB reports unrated entries as `0.0`.
fn rating(vote_average: Option<f64>) -> Option<f64> {
    vote_average.filter(|v| *v > 0.0)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> anyhow::Result<Vec<SearchResult>> {
        let mut params = vec![("query", title)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("first_air_date_year", y.as_str()));
        }

        let url = self.url("/search/tv", &params);
        debug!(title, ?year, "TMDB search TV");

        let body: TmdbSearchResponse<TmdbTvSearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB TV search response")?;

        let mut results: Vec<SearchResult> = body
            .results
            .into_iter()
            .map(|r| {
                let result_title = r.name.unwrap_or_default();
                let result_year = parse_year(&r.first_air_date);
                let confidence = Self::confidence(title, &result_title, year, result_year);
                SearchResult {
                    id: r.id.to_string(),
                    title: result_title,
                    year: result_year,
                    overview: non_empty(r.overview),
                    confidence,
                    provider_name: "tmdb".to_string(),
                    poster_url: r.poster_path.map(|p| self.image_url(&p)),
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    async fn get_series(&self, provider_id: &str) -> anyhow::Result<SeriesMetadata> {
        let url = self.url(
            &format!("/tv/{provider_id}"),
            &[("append_to_response", "credits,external_ids")],
        );
        debug!(provider_id, "TMDB get TV details");

        let detail: TmdbTvDetail = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB TV detail response")?;

        let mut provider_ids = HashMap::new();
        provider_ids.insert("tmdb".to_string(), detail.id.to_string());
        if let Some(ref ext) = detail.external_ids {
            if let Some(ref imdb) = ext.imdb_id {
                provider_ids.insert("imdb".to_string(), imdb.clone());
            }
            if let Some(tvdb) = ext.tvdb_id {
                provider_ids.insert("tvdb".to_string(), tvdb.to_string());
            }
        }

        let seasons = detail
            .seasons
            .unwrap_or_default()
            .into_iter()
            .filter(|s| s.season_number > 0)
            .map(|s| SeasonSummary {
                number: s.season_number,
                episode_count: s.episode_count.unwrap_or(0),
                overview: non_empty(s.overview),
            })
            .collect();

        let cast = detail
            .credits
            .map(|c| c.cast.into_iter().take(MAX_CAST).map(|p| p.name).collect())
            .unwrap_or_default();

        Ok(SeriesMetadata {
            canonical_id: detail.id.to_string(),
            title: detail.name.unwrap_or_default(),
            original_title: detail.original_name,
            year: parse_year(&detail.first_air_date),
            overview: non_empty(detail.overview),
            genres: detail
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            cast,
            community_rating: rating(detail.vote_average),
            poster_url: detail.poster_path.map(|p| self.image_url(&p)),
            backdrop_url: detail.backdrop_path.map(|p| self.image_url(&p)),
            seasons,
            provider_ids,
        })
    }

    async fn get_season_episodes(
        &self,
        provider_id: &str,
        season: u32,
    ) -> anyhow::Result<Vec<EpisodeMetadata>> {
        let url = self.url(&format!("/tv/{provider_id}/season/{season}"), &[]);
        debug!(provider_id, season, "TMDB get season");

        let detail: TmdbSeasonDetail = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB season response")?;

        Ok(detail
            .episodes
            .into_iter()
            .map(|e| EpisodeMetadata {
                number: e.episode_number,
                title: non_empty(e.name),
                overview: non_empty(e.overview),
                rating: rating(e.vote_average),
                still_url: e.still_path.map(|p| self.image_url(&p)),
                guest_stars: e.guest_stars.into_iter().map(|p| p.name).collect(),
            })
            .collect())
    }
}
