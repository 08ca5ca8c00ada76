//! Series database queries.
//!
//! Series are matched across rescans by `hd_path`, never by title.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use vidshelf_common::{Error, Result, SeriesId};

use super::{encode_string_list, parse_id, parse_string_list, parse_timestamp};
use crate::models::{Series, SeriesSummary};

const SERIES_COLUMNS: &str = "id, volume_id, title, year, hd_path, canonical_id,
    canonical_id_locked, synopsis, cast_members, genres, rating, poster_url, poster_path,
    backdrop_url, backdrop_path, enriched, watched, hidden, created_at, updated_at";

/// Parse a series from a database row.
fn parse_series_row(row: &rusqlite::Row) -> rusqlite::Result<Series> {
    Ok(Series {
        id: parse_id(row, 0)?,
        volume_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        hd_path: row.get(4)?,
        canonical_id: row.get(5)?,
        canonical_id_locked: row.get(6)?,
        synopsis: row.get(7)?,
        cast: parse_string_list(row, 8)?,
        genres: parse_string_list(row, 9)?,
        rating: row.get(10)?,
        poster_url: row.get(11)?,
        poster_path: row.get(12)?,
        backdrop_url: row.get(13)?,
        backdrop_path: row.get(14)?,
        enriched: row.get(15)?,
        watched: row.get(16)?,
        hidden: row.get(17)?,
        created_at: parse_timestamp(row, 18)?,
        updated_at: parse_timestamp(row, 19)?,
    })
}

/// Insert or update a series.
///
/// If a series with the same ID exists every column is overwritten except
/// `created_at`. Merge policy (what may be overwritten) is the caller's job.
///
/// # Returns
///
/// * `Ok(())` - If the operation succeeded
/// * `Err(Error)` - If a database error occurs, including a second series
///   claiming an `hd_path` already in use
pub fn upsert_series(conn: &Connection, series: &Series) -> Result<()> {
    let cast_json = encode_string_list(&series.cast)?;
    let genres_json = encode_string_list(&series.genres)?;

    conn.execute(
        "INSERT INTO series (
            id, volume_id, title, year, hd_path, canonical_id, canonical_id_locked,
            synopsis, cast_members, genres, rating, poster_url, poster_path,
            backdrop_url, backdrop_path, enriched, watched, hidden, created_at, updated_at
         ) VALUES (
            :id, :volume_id, :title, :year, :hd_path, :canonical_id, :canonical_id_locked,
            :synopsis, :cast_members, :genres, :rating, :poster_url, :poster_path,
            :backdrop_url, :backdrop_path, :enriched, :watched, :hidden, :created_at, :updated_at
         )
         ON CONFLICT(id) DO UPDATE SET
            volume_id = :volume_id,
            title = :title,
            year = :year,
            hd_path = :hd_path,
            canonical_id = :canonical_id,
            canonical_id_locked = :canonical_id_locked,
            synopsis = :synopsis,
            cast_members = :cast_members,
            genres = :genres,
            rating = :rating,
            poster_url = :poster_url,
            poster_path = :poster_path,
            backdrop_url = :backdrop_url,
            backdrop_path = :backdrop_path,
            enriched = :enriched,
            watched = :watched,
            hidden = :hidden,
            updated_at = :updated_at",
        rusqlite::named_params! {
            ":id": series.id.to_string(),
            ":volume_id": &series.volume_id,
            ":title": &series.title,
            ":year": series.year,
            ":hd_path": &series.hd_path,
            ":canonical_id": &series.canonical_id,
            ":canonical_id_locked": series.canonical_id_locked,
            ":synopsis": &series.synopsis,
            ":cast_members": cast_json,
            ":genres": genres_json,
            ":rating": series.rating,
            ":poster_url": &series.poster_url,
            ":poster_path": &series.poster_path,
            ":backdrop_url": &series.backdrop_url,
            ":backdrop_path": &series.backdrop_path,
            ":enriched": series.enriched,
            ":watched": series.watched,
            ":hidden": series.hidden,
            ":created_at": series.created_at.to_rfc3339(),
            ":updated_at": series.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Get a series by ID.
///
/// # Returns
///
/// * `Ok(Some(Series))` - The series if found
/// * `Ok(None)` - If the series does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_series(conn: &Connection, id: SeriesId) -> Result<Option<Series>> {
    conn.query_row(
        &format!("SELECT {SERIES_COLUMNS} FROM series WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_series_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Find the series rooted at `path`.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `path` - Series root directory, exactly as stored at first insert
///
/// # Returns
///
/// * `Ok(Some(Series))` - The series sharing this root path
/// * `Ok(None)` - If no series has this root path
/// * `Err(Error)` - If a database error occurs
pub fn find_series_by_path(conn: &Connection, path: &str) -> Result<Option<Series>> {
    let result = conn.query_row(
        &format!("SELECT {SERIES_COLUMNS} FROM series WHERE hd_path = :path"),
        rusqlite::named_params! { ":path": path },
        parse_series_row,
    );

    match result {
        Ok(series) => Ok(Some(series)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all series ordered by title.
pub fn list_series(conn: &Connection) -> Result<Vec<Series>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SERIES_COLUMNS} FROM series ORDER BY title COLLATE NOCASE, hd_path"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map([], parse_series_row)
        .map_err(|e| Error::database(e.to_string()))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))
}

/// List all series with season, episode and watched-episode counts.
pub fn list_series_summaries(conn: &Connection) -> Result<Vec<SeriesSummary>> {
    let series = list_series(conn)?;
    let mut stmt = conn
        .prepare(
            "SELECT
                (SELECT COUNT(*) FROM seasons WHERE series_id = :id),
                (SELECT COUNT(*) FROM episodes e JOIN seasons s ON e.season_id = s.id
                  WHERE s.series_id = :id),
                (SELECT COUNT(*) FROM episodes e JOIN seasons s ON e.season_id = s.id
                  WHERE s.series_id = :id AND e.watched = 1)",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let mut summaries = Vec::with_capacity(series.len());
    for s in series {
        let (season_count, episode_count, watched_count) = stmt
            .query_row(rusqlite::named_params! { ":id": s.id.to_string() }, |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| Error::database(e.to_string()))?;
        summaries.push(SeriesSummary {
            series: s,
            season_count,
            episode_count,
            watched_count,
        });
    }
    Ok(summaries)
}

/// Set the user-owned hidden flag.
///
/// # Returns
///
/// * `Ok(true)` - The series was updated
/// * `Ok(false)` - No series with this ID
pub fn set_series_hidden(conn: &Connection, id: SeriesId, hidden: bool) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE series SET hidden = :hidden, updated_at = :now WHERE id = :id",
            rusqlite::named_params! {
                ":hidden": hidden,
                ":now": Utc::now().to_rfc3339(),
                ":id": id.to_string(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(changed > 0)
}

/// Manually assign the external canonical id and lock it against rescans.
///
/// # Returns
///
/// * `Ok(true)` - The series was updated
/// * `Ok(false)` - No series with this ID
pub fn assign_canonical_id(conn: &Connection, id: SeriesId, canonical_id: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE series
             SET canonical_id = :canonical_id, canonical_id_locked = 1, updated_at = :now
             WHERE id = :id",
            rusqlite::named_params! {
                ":canonical_id": canonical_id,
                ":now": Utc::now().to_rfc3339(),
                ":id": id.to_string(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(changed > 0)
}

/// Recompute the cached series `watched` flag from its episodes.
///
/// A series is watched when it has at least one episode and every episode is
/// watched.
///
/// # Returns
///
/// The new value of the flag.
pub fn refresh_series_watched(conn: &Connection, id: SeriesId) -> Result<bool> {
    let (total, watched): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(e.watched), 0)
             FROM episodes e JOIN seasons s ON e.season_id = s.id
             WHERE s.series_id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let all_watched = total > 0 && total == watched;
    conn.execute(
        "UPDATE series SET watched = :watched WHERE id = :id",
        rusqlite::named_params! { ":watched": all_watched, ":id": id.to_string() },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(all_watched)
}

/// Delete a series and, by cascade, its seasons and episodes.
///
/// This is an explicit user action; scanning never deletes.
///
/// # Returns
///
/// * `Ok(true)` - The series was deleted
/// * `Ok(false)` - No series with this ID
pub fn delete_series(conn: &Connection, id: SeriesId) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM series WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(changed > 0)
}
