//! Merge of enriched scan results into the catalog.
//!
//! Series are matched by root path. Seasons and episodes are matched by
//! number under their parent. Existing rows keep their user-owned state
//! (`watched`, `hidden`, a locked canonical id); text the user may have
//! curated (synopsis, cast) is only filled when empty. Rows missing from a
//! rescan are never deleted.

use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};
use vidshelf_common::{Error, Result, SeasonId};
use vidshelf_db::models::{Episode, Season, Series};
use vidshelf_db::pool::{get_conn, DbPool};
use vidshelf_db::queries::{episodes, seasons, series};

use crate::metadata::EnrichedSeries;
use crate::scanner::{DiscoveredEpisode, DiscoveredSeason};

/// What one merge did.
#[derive(Debug, Clone, Serialize)]
pub struct PersistedSeries {
    /// The series row after the merge.
    pub series: Series,
    /// True when no series shared the root path before.
    pub created: bool,
    pub seasons: usize,
    pub episodes_added: usize,
    pub episodes_updated: usize,
}

/// Writes enriched series into the catalog.
///
/// Writes through one synchronizer are serialized.
pub struct Synchronizer {
    pool: DbPool,
    write_lock: Mutex<()>,
}

impl Synchronizer {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Canonical id the user locked on the series rooted at `root`, if any.
    pub fn locked_canonical_id(&self, root: &Path) -> Result<Option<String>> {
        let conn = get_conn(&self.pool)?;
        let existing = series::find_series_by_path(&conn, &path_string(root))?;
        Ok(existing
            .filter(|s| s.canonical_id_locked)
            .and_then(|s| s.canonical_id))
    }

    /// Merge one series in a single transaction.
    ///
    /// A failure rolls back this series only; earlier merges stay committed.
    pub fn merge(&self, input: &EnrichedSeries, volume_id: Option<&str>) -> Result<PersistedSeries> {
        let outcome = self.with_write_tx(|conn| merge_series(conn, input, volume_id))?;

        info!(
            path = %outcome.series.hd_path,
            title = %outcome.series.title,
            created = outcome.created,
            seasons = outcome.seasons,
            episodes_added = outcome.episodes_added,
            episodes_updated = outcome.episodes_updated,
            "Series merged"
        );
        Ok(outcome)
    }

    /// Run `f` inside one transaction while holding the write lock. The
    /// transaction is rolled back when `f` fails.
    pub(super) fn with_write_tx<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock();
        let conn = get_conn(&self.pool)?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(format!("Failed to start transaction: {e}")))?;

        let value = f(&tx)?;

        tx.commit()
            .map_err(|e| Error::database(format!("Failed to commit transaction: {e}")))?;
        Ok(value)
    }
}

fn merge_series(
    conn: &Connection,
    input: &EnrichedSeries,
    volume_id: Option<&str>,
) -> Result<PersistedSeries> {
    let hd_path = path_string(&input.discovered.root_path);

    let (mut row, created) = match series::find_series_by_path(conn, &hd_path)? {
        Some(existing) => (existing, false),
        None => (Series::new(input.title.clone(), hd_path), true),
    };
    debug!(path = %row.hd_path, created, "Merging series");

    apply_series_fields(&mut row, input, volume_id);
    row.updated_at = Utc::now();
    series::upsert_series(conn, &row)?;

    let mut outcome = PersistedSeries {
        series: row,
        created,
        seasons: 0,
        episodes_added: 0,
        episodes_updated: 0,
    };

    for season in &input.discovered.seasons {
        merge_season(conn, &mut outcome, input, season)?;
        outcome.seasons += 1;
    }

    series::refresh_series_watched(conn, outcome.series.id)?;
    outcome.series = series::get_series(conn, outcome.series.id)?
        .ok_or_else(|| Error::not_found(format!("series {}", outcome.series.id)))?;

    Ok(outcome)
}

fn apply_series_fields(row: &mut Series, input: &EnrichedSeries, volume_id: Option<&str>) {
    if let Some(volume_id) = volume_id {
        row.volume_id = Some(volume_id.to_string());
    }

    // A lookup miss must not undo an earlier successful enrichment.
    if input.enriched || !row.enriched {
        row.title = input.title.clone();
        if let Some(year) = input.year {
            row.year = Some(i32::from(year));
        }
    }

    if input.enriched {
        if !row.canonical_id_locked {
            row.canonical_id = input.canonical_id.clone();
        }
        row.enriched = true;
    }

    fill_text(&mut row.synopsis, input.synopsis.as_deref());
    if row.cast.is_empty() && !input.cast.is_empty() {
        row.cast = input.cast.clone();
    }

    if !input.genres.is_empty() {
        row.genres = input.genres.clone();
    }
    refresh(&mut row.rating, input.rating);
    refresh(&mut row.poster_url, input.poster_url.clone());
    refresh(&mut row.backdrop_url, input.backdrop_url.clone());
    refresh(&mut row.poster_path, input.poster_path.as_deref().map(path_string));
    refresh(&mut row.backdrop_path, input.backdrop_path.as_deref().map(path_string));
}

fn merge_season(
    conn: &Connection,
    outcome: &mut PersistedSeries,
    input: &EnrichedSeries,
    season: &DiscoveredSeason,
) -> Result<()> {
    let number = to_i32(season.number, "season number")?;
    let series_id = outcome.series.id;

    let mut row = seasons::find_season(conn, series_id, number)?
        .unwrap_or_else(|| Season::new(series_id, number));
    fill_text(
        &mut row.synopsis,
        input.season_synopses.get(&season.number).map(String::as_str),
    );
    row.updated_at = Utc::now();
    seasons::upsert_season(conn, &row)?;

    for episode in &season.episodes {
        if merge_episode(conn, row.id, input, season.number, episode)? {
            outcome.episodes_added += 1;
        } else {
            outcome.episodes_updated += 1;
        }
    }

    let available = i32::try_from(episodes::count_episodes(conn, row.id)?).unwrap_or(i32::MAX);
    let reported = input
        .season_totals
        .get(&season.number)
        .map(|&n| i32::try_from(n).unwrap_or(i32::MAX))
        .unwrap_or(row.total_episodes);
    row.available_episodes = available;
    row.total_episodes = reported.max(available);
    seasons::upsert_season(conn, &row)?;
    seasons::refresh_season_watched(conn, row.id)?;

    Ok(())
}

/// Returns true when the episode row was created.
fn merge_episode(
    conn: &Connection,
    season_id: SeasonId,
    input: &EnrichedSeries,
    season_number: u32,
    episode: &DiscoveredEpisode,
) -> Result<bool> {
    let number = to_i32(episode.number, "episode number")?;
    let file_path = path_string(&episode.path);

    let (mut row, created) = match episodes::find_episode(conn, season_id, number)? {
        Some(existing) => (existing, false),
        None => (
            Episode::new(season_id, number, file_path.clone(), episode.file_name.clone()),
            true,
        ),
    };

    row.file_path = file_path;
    row.file_name = episode.file_name.clone();
    row.size_bytes = i64::try_from(episode.size_bytes).unwrap_or(i64::MAX);
    row.duration_minutes = Some(to_i32(episode.duration_minutes, "duration")?);

    if let Some(meta) = input.episode(season_number, episode.number) {
        refresh(&mut row.title, meta.title.clone());
        fill_text(&mut row.synopsis, meta.synopsis.as_deref());
        if row.cast.is_empty() && !meta.cast.is_empty() {
            row.cast = meta.cast.clone();
        }
        refresh(&mut row.rating, meta.rating);
        refresh(&mut row.still_url, meta.still_url.clone());
        refresh(&mut row.still_path, meta.still_path.as_deref().map(path_string));
    }

    row.updated_at = Utc::now();
    episodes::upsert_episode(conn, &row)?;
    Ok(created)
}

/// Set `slot` from `incoming` only while `slot` is blank.
fn fill_text(slot: &mut Option<String>, incoming: Option<&str>) {
    let blank = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if !blank {
        return;
    }
    if let Some(value) = incoming.filter(|v| !v.trim().is_empty()) {
        *slot = Some(value.to_string());
    }
}

/// Overwrite `slot` when a new value is present.
fn refresh<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn to_i32(value: u32, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::invalid_input(format!("{what} out of range: {value}")))
}

pub(crate) fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
