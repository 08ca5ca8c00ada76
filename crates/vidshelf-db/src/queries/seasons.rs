//! Season database queries.

use chrono::Utc;
use rusqlite::Connection;
use vidshelf_common::{Error, Result, SeasonId, SeriesId};

use super::{parse_id, parse_timestamp};
use crate::models::Season;

const SEASON_COLUMNS: &str = "id, series_id, number, total_episodes, available_episodes,
    synopsis, watched, hidden, created_at, updated_at";

fn parse_season_row(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    Ok(Season {
        id: parse_id(row, 0)?,
        series_id: parse_id(row, 1)?,
        number: row.get(2)?,
        total_episodes: row.get(3)?,
        available_episodes: row.get(4)?,
        synopsis: row.get(5)?,
        watched: row.get(6)?,
        hidden: row.get(7)?,
        created_at: parse_timestamp(row, 8)?,
        updated_at: parse_timestamp(row, 9)?,
    })
}

/// Insert or update a season.
///
/// # Returns
///
/// * `Ok(())` - If the operation succeeded
/// * `Err(Error)` - If a database error occurs, including a second season
///   claiming a number already used within the same series
pub fn upsert_season(conn: &Connection, season: &Season) -> Result<()> {
    conn.execute(
        "INSERT INTO seasons (
            id, series_id, number, total_episodes, available_episodes,
            synopsis, watched, hidden, created_at, updated_at
         ) VALUES (
            :id, :series_id, :number, :total_episodes, :available_episodes,
            :synopsis, :watched, :hidden, :created_at, :updated_at
         )
         ON CONFLICT(id) DO UPDATE SET
            number = :number,
            total_episodes = :total_episodes,
            available_episodes = :available_episodes,
            synopsis = :synopsis,
            watched = :watched,
            hidden = :hidden,
            updated_at = :updated_at",
        rusqlite::named_params! {
            ":id": season.id.to_string(),
            ":series_id": season.series_id.to_string(),
            ":number": season.number,
            ":total_episodes": season.total_episodes,
            ":available_episodes": season.available_episodes,
            ":synopsis": &season.synopsis,
            ":watched": season.watched,
            ":hidden": season.hidden,
            ":created_at": season.created_at.to_rfc3339(),
            ":updated_at": season.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Find a season by its number within a series.
///
/// # Returns
///
/// * `Ok(Some(Season))` - The season if found
/// * `Ok(None)` - If the series has no season with this number
/// * `Err(Error)` - If a database error occurs
pub fn find_season(conn: &Connection, series_id: SeriesId, number: i32) -> Result<Option<Season>> {
    let result = conn.query_row(
        &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE series_id = :series_id AND number = :number"),
        rusqlite::named_params! { ":series_id": series_id.to_string(), ":number": number },
        parse_season_row,
    );

    match result {
        Ok(season) => Ok(Some(season)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get a season by ID.
pub fn get_season(conn: &Connection, id: SeasonId) -> Result<Option<Season>> {
    let result = conn.query_row(
        &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_season_row,
    );

    match result {
        Ok(season) => Ok(Some(season)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List the seasons of a series in ascending number order.
pub fn list_seasons(conn: &Connection, series_id: SeriesId) -> Result<Vec<Season>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SEASON_COLUMNS} FROM seasons WHERE series_id = :series_id ORDER BY number"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(
            rusqlite::named_params! { ":series_id": series_id.to_string() },
            parse_season_row,
        )
        .map_err(|e| Error::database(e.to_string()))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))
}

/// Set the user-owned hidden flag on a season.
///
/// # Returns
///
/// * `Ok(true)` - The season was updated
/// * `Ok(false)` - No season with this ID
pub fn set_season_hidden(conn: &Connection, id: SeasonId, hidden: bool) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE seasons SET hidden = :hidden, updated_at = :now WHERE id = :id",
            rusqlite::named_params! {
                ":hidden": hidden,
                ":now": Utc::now().to_rfc3339(),
                ":id": id.to_string(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(changed > 0)
}

/// Recompute the cached season `watched` flag from its episodes.
///
/// # Returns
///
/// The new value of the flag; a season without episodes is not watched.
pub fn refresh_season_watched(conn: &Connection, id: SeasonId) -> Result<bool> {
    let (total, watched): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(watched), 0) FROM episodes WHERE season_id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let all_watched = total > 0 && total == watched;
    conn.execute(
        "UPDATE seasons SET watched = :watched WHERE id = :id",
        rusqlite::named_params! { ":watched": all_watched, ":id": id.to_string() },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(all_watched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Series;
    use crate::pool::init_memory_pool;
    use crate::queries::series::{delete_series, upsert_series};

    fn seed_series(conn: &Connection) -> Series {
        let series = Series::new("Show", "/HD/Show");
        upsert_series(conn, &series).unwrap();
        series
    }

    #[test]
    fn test_upsert_and_find() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let series = seed_series(&conn);

        let mut season = Season::new(series.id, 2);
        season.available_episodes = 3;
        season.total_episodes = 10;
        upsert_season(&conn, &season).unwrap();

        let found = find_season(&conn, series.id, 2).unwrap().unwrap();
        assert_eq!(found.id, season.id);
        assert_eq!(found.available_episodes, 3);
        assert_eq!(found.total_episodes, 10);

        assert!(find_season(&conn, series.id, 1).unwrap().is_none());
    }

    #[test]
    fn test_season_numbers_unique_within_series() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let series = seed_series(&conn);

        upsert_season(&conn, &Season::new(series.id, 1)).unwrap();
        let result = upsert_season(&conn, &Season::new(series.id, 1));
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[test]
    fn test_list_sorted_by_number() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let series = seed_series(&conn);

        for n in [3, 1, 2] {
            upsert_season(&conn, &Season::new(series.id, n)).unwrap();
        }

        let numbers: Vec<i32> = list_seasons(&conn, series.id)
            .unwrap()
            .iter()
            .map(|s| s.number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_set_hidden() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let series = seed_series(&conn);
        let season = Season::new(series.id, 1);
        upsert_season(&conn, &season).unwrap();

        assert!(set_season_hidden(&conn, season.id, true).unwrap());
        assert!(get_season(&conn, season.id).unwrap().unwrap().hidden);
    }

    #[test]
    fn test_cascade_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let series = seed_series(&conn);
        let season = Season::new(series.id, 1);
        upsert_season(&conn, &season).unwrap();

        delete_series(&conn, series.id).unwrap();
        assert!(get_season(&conn, season.id).unwrap().is_none());
    }
}
