//! Episode database queries.

use chrono::Utc;
use rusqlite::Connection;
use vidshelf_common::{EpisodeId, Error, Result, SeasonId};

use super::{encode_string_list, parse_id, parse_string_list, parse_timestamp};
use crate::models::Episode;

const EPISODE_COLUMNS: &str = "id, season_id, number, title, file_path, file_name, size_bytes,
    duration_minutes, synopsis, cast_members, rating, still_url, still_path, watched, hidden,
    created_at, updated_at";

fn parse_episode_row(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: parse_id(row, 0)?,
        season_id: parse_id(row, 1)?,
        number: row.get(2)?,
        title: row.get(3)?,
        file_path: row.get(4)?,
        file_name: row.get(5)?,
        size_bytes: row.get(6)?,
        duration_minutes: row.get(7)?,
        synopsis: row.get(8)?,
        cast: parse_string_list(row, 9)?,
        rating: row.get(10)?,
        still_url: row.get(11)?,
        still_path: row.get(12)?,
        watched: row.get(13)?,
        hidden: row.get(14)?,
        created_at: parse_timestamp(row, 15)?,
        updated_at: parse_timestamp(row, 16)?,
    })
}

/// Insert or update an episode.
///
/// # Returns
///
/// * `Ok(())` - If the operation succeeded
/// * `Err(Error)` - If a database error occurs, including a second episode
///   claiming a number already used within the same season
pub fn upsert_episode(conn: &Connection, episode: &Episode) -> Result<()> {
    let cast_json = encode_string_list(&episode.cast)?;

    conn.execute(
        "INSERT INTO episodes (
            id, season_id, number, title, file_path, file_name, size_bytes,
            duration_minutes, synopsis, cast_members, rating, still_url, still_path,
            watched, hidden, created_at, updated_at
         ) VALUES (
            :id, :season_id, :number, :title, :file_path, :file_name, :size_bytes,
            :duration_minutes, :synopsis, :cast_members, :rating, :still_url, :still_path,
            :watched, :hidden, :created_at, :updated_at
         )
         ON CONFLICT(id) DO UPDATE SET
            number = :number,
            title = :title,
            file_path = :file_path,
            file_name = :file_name,
            size_bytes = :size_bytes,
            duration_minutes = :duration_minutes,
            synopsis = :synopsis,
            cast_members = :cast_members,
            rating = :rating,
            still_url = :still_url,
            still_path = :still_path,
            watched = :watched,
            hidden = :hidden,
            updated_at = :updated_at",
        rusqlite::named_params! {
            ":id": episode.id.to_string(),
            ":season_id": episode.season_id.to_string(),
            ":number": episode.number,
            ":title": &episode.title,
            ":file_path": &episode.file_path,
            ":file_name": &episode.file_name,
            ":size_bytes": episode.size_bytes,
            ":duration_minutes": episode.duration_minutes,
            ":synopsis": &episode.synopsis,
            ":cast_members": cast_json,
            ":rating": episode.rating,
            ":still_url": &episode.still_url,
            ":still_path": &episode.still_path,
            ":watched": episode.watched,
            ":hidden": episode.hidden,
            ":created_at": episode.created_at.to_rfc3339(),
            ":updated_at": episode.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Find an episode by its number within a season.
///
/// # Returns
///
/// * `Ok(Some(Episode))` - The episode if found
/// * `Ok(None)` - If the season has no episode with this number
/// * `Err(Error)` - If a database error occurs
pub fn find_episode(conn: &Connection, season_id: SeasonId, number: i32) -> Result<Option<Episode>> {
    let result = conn.query_row(
        &format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes WHERE season_id = :season_id AND number = :number"
        ),
        rusqlite::named_params! { ":season_id": season_id.to_string(), ":number": number },
        parse_episode_row,
    );

    match result {
        Ok(episode) => Ok(Some(episode)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get an episode by ID.
pub fn get_episode(conn: &Connection, id: EpisodeId) -> Result<Option<Episode>> {
    let result = conn.query_row(
        &format!("SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_episode_row,
    );

    match result {
        Ok(episode) => Ok(Some(episode)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List the episodes of a season in ascending number order.
pub fn list_episodes(conn: &Connection, season_id: SeasonId) -> Result<Vec<Episode>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes WHERE season_id = :season_id ORDER BY number"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(
            rusqlite::named_params! { ":season_id": season_id.to_string() },
            parse_episode_row,
        )
        .map_err(|e| Error::database(e.to_string()))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))
}

/// Count the episodes stored for a season.
pub fn count_episodes(conn: &Connection, season_id: SeasonId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM episodes WHERE season_id = :season_id",
        rusqlite::named_params! { ":season_id": season_id.to_string() },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Set the user-owned watched flag on an episode.
///
/// Cached season/series flags are not touched here; callers refresh them.
///
/// # Returns
///
/// * `Ok(true)` - The episode was updated
/// * `Ok(false)` - No episode with this ID
pub fn set_episode_watched(conn: &Connection, id: EpisodeId, watched: bool) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE episodes SET watched = :watched, updated_at = :now WHERE id = :id",
            rusqlite::named_params! {
                ":watched": watched,
                ":now": Utc::now().to_rfc3339(),
                ":id": id.to_string(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(changed > 0)
}
