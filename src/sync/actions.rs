//! Explicit user actions on the catalog.
//!
//! Scanning never performs any of these; they exist so that user-owned state
//! is only ever changed on request.

use tracing::info;
use vidshelf_common::{EpisodeId, Error, Result, SeasonId, SeriesId};
use vidshelf_db::models::SeriesSummary;
use vidshelf_db::pool::get_conn;
use vidshelf_db::queries::{episodes, seasons, series};

use super::merge::Synchronizer;

impl Synchronizer {
    /// Mark an episode watched or unwatched and refresh the cached season and
    /// series flags.
    ///
    /// Returns `Ok(false)` when no such episode exists.
    pub fn set_episode_watched(&self, id: EpisodeId, watched: bool) -> Result<bool> {
        self.with_write_tx(|conn| {
            if !episodes::set_episode_watched(conn, id, watched)? {
                return Ok(false);
            }
            let episode = episodes::get_episode(conn, id)?
                .ok_or_else(|| Error::not_found(format!("episode {id}")))?;
            let season = seasons::get_season(conn, episode.season_id)?
                .ok_or_else(|| Error::not_found(format!("season {}", episode.season_id)))?;
            seasons::refresh_season_watched(conn, season.id)?;
            series::refresh_series_watched(conn, season.series_id)?;
            Ok(true)
        })
    }

    pub fn set_series_hidden(&self, id: SeriesId, hidden: bool) -> Result<bool> {
        self.with_write_tx(|conn| series::set_series_hidden(conn, id, hidden))
    }

    pub fn set_season_hidden(&self, id: SeasonId, hidden: bool) -> Result<bool> {
        self.with_write_tx(|conn| seasons::set_season_hidden(conn, id, hidden))
    }

    /// Pin the external id of a series. Later enrichment fetches by this id
    /// and merges never replace it.
    pub fn assign_canonical_id(&self, id: SeriesId, canonical_id: &str) -> Result<bool> {
        let canonical_id = canonical_id.trim();
        if canonical_id.is_empty() {
            return Err(Error::invalid_input("canonical id must not be empty"));
        }
        let changed =
            self.with_write_tx(|conn| series::assign_canonical_id(conn, id, canonical_id))?;
        if changed {
            info!(series_id = %id, canonical_id, "Canonical id assigned");
        }
        Ok(changed)
    }

    /// Remove a series with its seasons and episodes.
    pub fn delete_series(&self, id: SeriesId) -> Result<bool> {
        let deleted = self.with_write_tx(|conn| series::delete_series(conn, id))?;
        if deleted {
            info!(series_id = %id, "Series deleted");
        }
        Ok(deleted)
    }

    /// All series with aggregate counts, ordered by title.
    pub fn list_summaries(&self) -> Result<Vec<SeriesSummary>> {
        let conn = get_conn(self.pool())?;
        series::list_series_summaries(&conn)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use vidshelf_db::pool::init_memory_pool;

    use crate::metadata::EnrichedSeries;
    use crate::scanner::{DiscoveredEpisode, DiscoveredSeason, DiscoveredSeries};
    use crate::sync::Synchronizer;

    use super::*;

    fn seeded() -> (Synchronizer, SeriesId) {
        let sync = Synchronizer::new(init_memory_pool().unwrap());
        let input = EnrichedSeries::unenriched(DiscoveredSeries {
            title: "Show".to_string(),
            root_path: PathBuf::from("/HD/Show"),
            year_hint: None,
            seasons: vec![DiscoveredSeason {
                number: 1,
                episodes: (1..=2)
                    .map(|n| DiscoveredEpisode {
                        number: n,
                        path: PathBuf::from(format!("/HD/Show/{n}.mkv")),
                        file_name: format!("{n}.mkv"),
                        size_bytes: 0,
                        duration_minutes: 1,
                    })
                    .collect(),
            }],
        });
        let out = sync.merge(&input, None).unwrap();
        (sync, out.series.id)
    }

    fn episode_ids(sync: &Synchronizer, series_id: SeriesId) -> Vec<EpisodeId> {
        let conn = sync.pool().get().unwrap();
        let season = seasons::find_season(&conn, series_id, 1).unwrap().unwrap();
        episodes::list_episodes(&conn, season.id)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    #[test]
    fn watching_every_episode_marks_series_watched() {
        let (sync, series_id) = seeded();
        let ids = episode_ids(&sync, series_id);

        assert!(sync.set_episode_watched(ids[0], true).unwrap());
        let summary = &sync.list_summaries().unwrap()[0];
        assert!(!summary.series.watched);
        assert_eq!(summary.watched_count, 1);

        assert!(sync.set_episode_watched(ids[1], true).unwrap());
        assert!(sync.list_summaries().unwrap()[0].series.watched);

        assert!(sync.set_episode_watched(ids[1], false).unwrap());
        assert!(!sync.list_summaries().unwrap()[0].series.watched);
    }

    #[test]
    fn unknown_ids_report_false() {
        let (sync, _) = seeded();
        assert!(!sync.set_episode_watched(EpisodeId::new(), true).unwrap());
        assert!(!sync.set_series_hidden(SeriesId::new(), true).unwrap());
        assert!(!sync.set_season_hidden(SeasonId::new(), true).unwrap());
        assert!(!sync.delete_series(SeriesId::new()).unwrap());
    }

    #[test]
    fn assign_rejects_blank_ids() {
        let (sync, series_id) = seeded();
        assert!(sync.assign_canonical_id(series_id, "  ").is_err());
        assert!(sync.assign_canonical_id(series_id, "1396").unwrap());
    }

    #[test]
    fn delete_cascades() {
        let (sync, series_id) = seeded();
        assert!(sync.delete_series(series_id).unwrap());
        assert!(sync.list_summaries().unwrap().is_empty());

        let conn = sync.pool().get().unwrap();
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
