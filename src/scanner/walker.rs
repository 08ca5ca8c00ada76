//! Recursive directory walker that assembles series, seasons and episodes.
//!
//! Every directory is handled in two passes: its immediate children are
//! listed and classified first, then the directory's role is decided from
//! that classification alone:
//!
//! - **series with seasons**: at least one child folder is a season folder.
//!   Episodes are read one level deep inside each season folder.
//! - **season of parent**: the directory is itself a season folder holding
//!   videos, so its parent becomes the series root.
//! - **leaf series**: at least one video named like an episode and no season
//!   folders. Files are grouped by the season encoded in their names, else
//!   season 1. Unrecognized names still get running numbers here.
//! - **pass-through**: nothing claimed here, recurse into the child folders.
//!
//! A directory claimed as a series root is not descended into further.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use vidshelf_common::paths::is_video_file_with;
use vidshelf_common::{Error, Result};
use walkdir::WalkDir;

use super::classifier::{classify_episode_file, classify_season_folder, SeasonPattern};
use super::duration::{estimate_duration_minutes, Resolution};
use super::title::{extract_series_title, extract_year_hint};
use super::types::{
    DiscoveredEpisode, DiscoveredSeason, DiscoveredSeries, DuplicatePolicy, LooseFilePolicy,
    ScanResult, WalkPolicy,
};

/// Directory walker. Holds no state between walks.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    policy: WalkPolicy,
}

#[derive(Debug)]
struct VideoFile {
    path: PathBuf,
    file_name: String,
    size_bytes: u64,
}

#[derive(Debug, Default)]
struct Listing {
    dirs: Vec<PathBuf>,
    videos: Vec<VideoFile>,
}

#[derive(Debug)]
enum DirRole {
    SeriesWithSeasons(Vec<(PathBuf, u32)>),
    SeasonOfParent { parent: PathBuf, number: u32 },
    LeafSeries,
    PassThrough,
}

#[derive(Debug, Default)]
struct SeasonBuilder {
    numbered: BTreeMap<u32, DiscoveredEpisode>,
    unnumbered: Vec<DiscoveredEpisode>,
}

#[derive(Debug)]
struct SeriesBuilder {
    title: String,
    year_hint: Option<u16>,
    seasons: BTreeMap<u32, SeasonBuilder>,
}

struct WalkState<'a> {
    policy: &'a WalkPolicy,
    visited: HashSet<PathBuf>,
    series: BTreeMap<PathBuf, SeriesBuilder>,
    skipped: Vec<PathBuf>,
}

impl Walker {
    pub fn new(policy: WalkPolicy) -> Self {
        Self { policy }
    }

    /// Walk `root` and return every series found beneath it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Io`] only when `root` does not exist or is not a
    /// directory. Unreadable subtrees are logged, recorded in
    /// [`ScanResult::skipped`] and otherwise ignored.
    pub fn walk(&self, root: &Path) -> Result<ScanResult> {
        if !root.exists() {
            return Err(Error::io(
                ErrorKind::NotFound,
                format!("scan root does not exist: {}", root.display()),
            ));
        }
        if !root.is_dir() {
            return Err(Error::io(
                ErrorKind::InvalidInput,
                format!("scan root is not a directory: {}", root.display()),
            ));
        }

        info!(root = %root.display(), "Walking directory tree");

        let mut state = WalkState {
            policy: &self.policy,
            visited: HashSet::new(),
            series: BTreeMap::new(),
            skipped: Vec::new(),
        };
        state.visit(root, 0);
        let result = state.finish(root);

        info!(
            root = %root.display(),
            series = result.series.len(),
            episodes = result.episode_count(),
            skipped = result.skipped.len(),
            "Walk complete"
        );
        Ok(result)
    }
}

impl WalkState<'_> {
    /// Returns false if `dir` (after resolving links) was already seen.
    fn mark_visited(&mut self, dir: &Path) -> bool {
        let canonical = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.visited.insert(canonical)
    }

    fn visit(&mut self, dir: &Path, depth: usize) {
        if depth > self.policy.max_depth {
            debug!(path = %dir.display(), depth, "Maximum walk depth reached");
            return;
        }
        if !self.mark_visited(dir) {
            debug!(path = %dir.display(), "Directory already visited");
            return;
        }

        let Some(listing) = self.list(dir) else {
            return;
        };

        match decide_role(dir, &listing, &self.policy.extra_extensions) {
            DirRole::SeriesWithSeasons(seasons) => {
                for (season_dir, number) in seasons {
                    self.read_season(dir, &season_dir, number);
                }
                self.add_loose_files(dir, listing.videos);
            }
            DirRole::SeasonOfParent { parent, number } => {
                debug!(
                    path = %dir.display(),
                    series_root = %parent.display(),
                    season = number,
                    "Season folder without series root, using parent"
                );
                for video in listing.videos {
                    self.add_episode(&parent, number, video);
                }
            }
            DirRole::LeafSeries => {
                for video in listing.videos {
                    let season = classify_episode_file(&video.file_name)
                        .and_then(|m| m.season)
                        .unwrap_or(1);
                    self.add_episode(dir, season, video);
                }
            }
            DirRole::PassThrough => {
                for child in listing.dirs {
                    self.visit(&child, depth + 1);
                }
            }
        }
    }

    fn read_season(&mut self, series_root: &Path, season_dir: &Path, number: u32) {
        if !self.mark_visited(season_dir) {
            debug!(path = %season_dir.display(), "Season folder already visited");
            return;
        }
        let Some(listing) = self.list(season_dir) else {
            return;
        };
        for nested in &listing.dirs {
            debug!(path = %nested.display(), "Ignoring folder nested in season folder");
        }
        for video in listing.videos {
            self.add_episode(series_root, number, video);
        }
    }

    fn add_loose_files(&mut self, series_root: &Path, videos: Vec<VideoFile>) {
        if videos.is_empty() {
            return;
        }
        match self.policy.loose_files {
            LooseFilePolicy::FoldIntoSeasons => {
                for video in videos {
                    let season = classify_episode_file(&video.file_name)
                        .and_then(|m| m.season)
                        .unwrap_or(1);
                    self.add_episode(series_root, season, video);
                }
            }
            LooseFilePolicy::Ignore => {
                debug!(
                    series_root = %series_root.display(),
                    count = videos.len(),
                    "Ignoring videos next to season folders"
                );
            }
        }
    }

    fn add_episode(&mut self, series_root: &Path, season: u32, video: VideoFile) {
        let parsed = classify_episode_file(&video.file_name).map(|m| m.episode);
        let duration =
            estimate_duration_minutes(video.size_bytes, Resolution::detect(&video.file_name));
        let episode = DiscoveredEpisode {
            number: parsed.unwrap_or(0),
            path: video.path,
            file_name: video.file_name,
            size_bytes: video.size_bytes,
            duration_minutes: duration,
        };

        let builder = self
            .series
            .entry(series_root.to_path_buf())
            .or_insert_with(|| SeriesBuilder::for_root(series_root));
        let season_builder = builder.seasons.entry(season).or_default();

        let Some(number) = parsed else {
            season_builder.unnumbered.push(episode);
            return;
        };

        match season_builder.numbered.entry(number) {
            Entry::Vacant(slot) => {
                slot.insert(episode);
            }
            Entry::Occupied(mut slot) => match self.policy.duplicate_episodes {
                DuplicatePolicy::KeepFirst => {
                    warn!(
                        season,
                        episode = number,
                        kept = %slot.get().path.display(),
                        dropped = %episode.path.display(),
                        "Duplicate episode number, keeping first"
                    );
                }
                DuplicatePolicy::KeepLast => {
                    warn!(
                        season,
                        episode = number,
                        kept = %episode.path.display(),
                        dropped = %slot.get().path.display(),
                        "Duplicate episode number, keeping last"
                    );
                    slot.insert(episode);
                }
            },
        }
    }

    /// List one directory level. Unreadable directories are logged and
    /// recorded as skipped.
    fn list(&mut self, dir: &Path) -> Option<Listing> {
        match list_dir(dir, &self.policy.extra_extensions) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                self.skipped.push(dir.to_path_buf());
                None
            }
        }
    }

    fn finish(self, root: &Path) -> ScanResult {
        let series = self
            .series
            .into_iter()
            .filter_map(|(root_path, builder)| builder.build(root_path))
            .collect();

        ScanResult {
            root: root.to_path_buf(),
            series,
            skipped: self.skipped,
        }
    }
}

impl SeriesBuilder {
    fn for_root(root: &Path) -> Self {
        let name = dir_name(root);
        Self {
            title: extract_series_title(&name),
            year_hint: extract_year_hint(&name),
            seasons: BTreeMap::new(),
        }
    }

    /// Returns `None` for a series without any episode.
    fn build(self, root_path: PathBuf) -> Option<DiscoveredSeries> {
        let seasons: Vec<DiscoveredSeason> = self
            .seasons
            .into_iter()
            .filter_map(|(number, season)| season.build(number))
            .collect();

        if seasons.is_empty() {
            return None;
        }
        Some(DiscoveredSeries {
            title: self.title,
            root_path,
            year_hint: self.year_hint,
            seasons,
        })
    }
}

impl SeasonBuilder {
    /// Unparsed files take the smallest free numbers, in the order they were
    /// found.
    fn build(mut self, number: u32) -> Option<DiscoveredSeason> {
        let mut next = 1;
        for mut episode in self.unnumbered {
            while self.numbered.contains_key(&next) {
                next += 1;
            }
            episode.number = next;
            self.numbered.insert(next, episode);
        }

        if self.numbered.is_empty() {
            return None;
        }
        Some(DiscoveredSeason {
            number,
            episodes: self.numbered.into_values().collect(),
        })
    }
}

/// Decide what a directory is from its own name and its classified children.
fn decide_role(dir: &Path, listing: &Listing, extra_extensions: &[String]) -> DirRole {
    let classified: Vec<_> = listing
        .dirs
        .iter()
        .map(|child| (child, classify_season_folder(&dir_name(child))))
        .collect();

    let all_children_seasonal = classified.iter().all(|(_, m)| m.is_some());
    let seasons: Vec<(PathBuf, u32)> = classified
        .iter()
        .filter_map(|(child, m)| {
            let m = (*m)?;
            // A bare number only names a season when every sibling folder
            // is season-shaped and it holds the episodes itself; otherwise
            // it is more likely a title.
            if m.pattern == SeasonPattern::BareNumber
                && !(all_children_seasonal && holds_episodes_directly(child, extra_extensions))
            {
                return None;
            }
            Some(((*child).clone(), m.number))
        })
        .collect();

    if !seasons.is_empty() {
        return DirRole::SeriesWithSeasons(seasons);
    }
    if listing.videos.is_empty() {
        return DirRole::PassThrough;
    }

    let own = classify_season_folder(&dir_name(dir));
    if let (Some(m), Some(parent)) = (own, dir.parent()) {
        if m.pattern != SeasonPattern::BareNumber {
            return DirRole::SeasonOfParent {
                parent: parent.to_path_buf(),
                number: m.number,
            };
        }
    }

    // Stray videos (samples, trailers, movies) do not make a series.
    let recognized = listing
        .videos
        .iter()
        .any(|video| classify_episode_file(&video.file_name).is_some());
    if recognized {
        DirRole::LeafSeries
    } else {
        debug!(
            path = %dir.display(),
            videos = listing.videos.len(),
            "No episode-like names, descending"
        );
        DirRole::PassThrough
    }
}

/// True when `dir` holds videos itself and no season-shaped folder.
fn holds_episodes_directly(dir: &Path, extra_extensions: &[String]) -> bool {
    match list_dir(dir, extra_extensions) {
        Ok(listing) => {
            !listing.videos.is_empty()
                && !listing
                    .dirs
                    .iter()
                    .any(|d| classify_season_folder(&dir_name(d)).is_some())
        }
        Err(_) => false,
    }
}

fn list_dir(dir: &Path, extra_extensions: &[String]) -> std::result::Result<Listing, walkdir::Error> {
    let mut listing = Listing::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 || e.path() == Some(dir) => return Err(e),
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            listing.dirs.push(entry.into_path());
        } else if file_type.is_file() && is_video_file_with(entry.path(), extra_extensions) {
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let file_name = entry.file_name().to_string_lossy().into_owned();
            listing.videos.push(VideoFile {
                path: entry.into_path(),
                file_name,
                size_bytes,
            });
        }
    }

    Ok(listing)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"video").unwrap();
    }

    fn tree(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            touch(dir.path(), f);
        }
        dir
    }

    fn numbers(season: &DiscoveredSeason) -> Vec<u32> {
        season.episodes.iter().map(|e| e.number).collect()
    }

    fn names(season: &DiscoveredSeason) -> Vec<&str> {
        season.episodes.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn season_folder_makes_parent_the_series_root() {
        let files: Vec<String> = (1..=7)
            .map(|n| format!("Breaking Bad/Temporada 1/S01E{n:02}.mp4"))
            .collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        let dir = tree(&refs);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);

        let series = &result.series[0];
        assert_eq!(series.title, "Breaking Bad");
        assert_eq!(series.root_path, dir.path().join("Breaking Bad"));
        assert_eq!(series.seasons.len(), 1);
        assert_eq!(series.seasons[0].number, 1);
        assert_eq!(numbers(&series.seasons[0]), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn leaf_folder_becomes_series_with_season_one() {
        let dir = tree(&["Loose Show/ep1.mp4", "Loose Show/ep2.mp4"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        let series = &result.series[0];
        assert_eq!(series.title, "Loose Show");
        assert_eq!(series.seasons.len(), 1);
        assert_eq!(series.seasons[0].number, 1);
        assert_eq!(numbers(&series.seasons[0]), vec![1, 2]);
    }

    #[test]
    fn unparsed_files_fill_free_numbers_in_name_order() {
        let dir = tree(&["Show/intro.mkv", "Show/03.mkv", "Show/zeta.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let season = &result.series[0].seasons[0];
        assert_eq!(numbers(season), vec![1, 2, 3]);
        assert_eq!(names(season), vec!["intro.mkv", "zeta.mkv", "03.mkv"]);
    }

    #[test]
    fn duplicate_episode_keeps_first_by_default() {
        let dir = tree(&["Show/Season 1/S01E01.mkv", "Show/Season 1/Show.S01E01.720p.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let season = &result.series[0].seasons[0];
        assert_eq!(names(season), vec!["S01E01.mkv"]);
    }

    #[test]
    fn duplicate_episode_keep_last_policy() {
        let dir = tree(&["Show/Season 1/S01E01.mkv", "Show/Season 1/Show.S01E01.720p.mkv"]);
        let walker = Walker::new(WalkPolicy {
            duplicate_episodes: DuplicatePolicy::KeepLast,
            ..WalkPolicy::default()
        });

        let result = walker.walk(dir.path()).unwrap();
        let season = &result.series[0].seasons[0];
        assert_eq!(names(season), vec!["Show.S01E01.720p.mkv"]);
    }

    #[test]
    fn seasons_and_episodes_are_sorted() {
        let dir = tree(&[
            "Show/Season 2/S02E02.mkv",
            "Show/Season 2/S02E01.mkv",
            "Show/S01/10.mkv",
            "Show/S01/2.mkv",
        ]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let series = &result.series[0];
        let season_numbers: Vec<u32> = series.seasons.iter().map(|s| s.number).collect();
        assert_eq!(season_numbers, vec![1, 2]);
        assert_eq!(numbers(&series.seasons[0]), vec![2, 10]);
        assert_eq!(numbers(&series.seasons[1]), vec![1, 2]);
    }

    #[test]
    fn nested_series_roots_are_found() {
        let dir = tree(&[
            "TV/Drama/The Wire/Season 1/S01E01.mkv",
            "TV/Comedy/Community (2009)/S01E01.mkv",
        ]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let titles: Vec<&str> = result.series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Community", "The Wire"]);
        assert_eq!(result.series[0].year_hint, Some(2009));
    }

    #[test]
    fn folders_without_videos_are_not_series() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Docs")).unwrap();
        fs::write(dir.path().join("Docs/readme.txt"), b"x").unwrap();
        fs::write(dir.path().join("Docs/cover.jpg"), b"x").unwrap();

        let result = Walker::default().walk(dir.path()).unwrap();
        assert!(result.series.is_empty());
    }

    #[test]
    fn leaf_groups_by_encoded_season() {
        let dir = tree(&["Show/S01E01.mkv", "Show/S02E01.mkv", "Show/S02E02.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let series = &result.series[0];
        assert_eq!(series.seasons.len(), 2);
        assert_eq!(numbers(&series.seasons[1]), vec![1, 2]);
    }

    #[test]
    fn walking_a_season_folder_uses_its_parent() {
        let dir = tree(&["Show/Season 3/01.mkv", "Show/Season 3/02.mkv"]);
        let root = dir.path().join("Show/Season 3");

        let result = Walker::default().walk(&root).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].root_path, dir.path().join("Show"));
        assert_eq!(result.series[0].title, "Show");
        assert_eq!(result.series[0].seasons[0].number, 3);
    }

    #[test]
    fn loose_files_fold_into_seasons() {
        let dir = tree(&["Show/Season 1/S01E01.mkv", "Show/S01E02.mkv", "Show/S02E01.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let series = &result.series[0];
        assert_eq!(numbers(&series.seasons[0]), vec![1, 2]);
        assert_eq!(series.seasons[1].number, 2);
    }

    #[test]
    fn loose_files_can_be_ignored() {
        let dir = tree(&["Show/Season 1/S01E01.mkv", "Show/S01E02.mkv"]);
        let walker = Walker::new(WalkPolicy {
            loose_files: LooseFilePolicy::Ignore,
            ..WalkPolicy::default()
        });

        let result = walker.walk(dir.path()).unwrap();
        assert_eq!(numbers(&result.series[0].seasons[0]), vec![1]);
    }

    #[test]
    fn season_folder_files_win_over_loose_duplicates() {
        let dir = tree(&["Show/Season 1/S01E01.mkv", "Show/A.S01E01.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let season = &result.series[0].seasons[0];
        assert_eq!(names(season), vec!["S01E01.mkv"]);
    }

    #[test]
    fn numeric_titles_are_not_seasons_among_titled_siblings() {
        let dir = tree(&["24/ep1.mkv", "Lost/ep1.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let titles: Vec<&str> = result.series.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["24", "Lost"]);
    }

    #[test]
    fn bare_numbered_season_folders() {
        let dir = tree(&["Show/01/01.mkv", "Show/02/01.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].title, "Show");
        assert_eq!(result.series[0].seasons.len(), 2);
    }

    #[test]
    fn lone_numeric_title_with_season_folders() {
        let dir = tree(&["24/Season 1/S01E01.mkv", "24/Season 1/S01E02.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        let series = &result.series[0];
        assert_eq!(series.title, "24");
        assert_eq!(series.root_path, dir.path().join("24"));
        assert_eq!(series.seasons.len(), 1);
        assert_eq!(series.seasons[0].number, 1);
        assert_eq!(numbers(&series.seasons[0]), vec![1, 2]);
    }

    #[test]
    fn unrecognized_videos_are_not_a_series() {
        let dir = tree(&["Movies/Inception.mkv", "Movies/Heat.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert!(result.series.is_empty());
    }

    #[test]
    fn stray_video_does_not_hide_nested_series() {
        let dir = tree(&["TV/sample.mkv", "TV/Dark/Season 1/S01E01.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].title, "Dark");
        assert_eq!(result.series[0].root_path, dir.path().join("TV/Dark"));
    }

    #[test]
    fn unrecognized_names_in_season_folder_are_kept() {
        let dir = tree(&["Show/Season 2/intro.mkv", "Show/Season 2/finale.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        let series = &result.series[0];
        assert_eq!(series.seasons[0].number, 2);
        assert_eq!(names(&series.seasons[0]), vec!["finale.mkv", "intro.mkv"]);
    }

    #[test]
    fn max_depth_is_enforced() {
        let dir = tree(&["a/b/c/Show/ep1.mkv"]);
        let walker = Walker::new(WalkPolicy {
            max_depth: 2,
            ..WalkPolicy::default()
        });

        assert!(walker.walk(dir.path()).unwrap().series.is_empty());
        assert_eq!(Walker::default().walk(dir.path()).unwrap().series.len(), 1);
    }

    #[test]
    fn extra_extensions_are_honoured() {
        let dir = tree(&["Show/ep1.rmvb"]);
        assert!(Walker::default().walk(dir.path()).unwrap().series.is_empty());

        let walker = Walker::new(WalkPolicy {
            extra_extensions: vec!["rmvb".to_string()],
            ..WalkPolicy::default()
        });
        assert_eq!(walker.walk(dir.path()).unwrap().series.len(), 1);
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let dir = tree(&[".trash/Show/ep1.mkv", "Show/._ep1.mkv", "Show/ep1.mkv"]);

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(names(&result.series[0].seasons[0]), vec!["ep1.mkv"]);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Walker::default()
            .walk(&dir.path().join("missing"))
            .unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = tree(&["ep1.mkv"]);
        let err = Walker::default().walk(&dir.path().join("ep1.mkv")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn durations_are_estimated() {
        let dir = tempfile::tempdir().unwrap();
        let show = dir.path().join("Show");
        fs::create_dir_all(&show).unwrap();
        // 720p nominal rate: 312_500 bytes/s; 37.5 MB is two minutes
        fs::write(show.join("S01E01.720p.mkv"), vec![0u8; 37_500_000]).unwrap();

        let result = Walker::default().walk(dir.path()).unwrap();
        let episode = &result.series[0].seasons[0].episodes[0];
        assert_eq!(episode.size_bytes, 37_500_000);
        assert_eq!(episode.duration_minutes, 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycles_terminate() {
        let dir = tree(&["Shows/Show/ep1.mkv"]);
        std::os::unix::fs::symlink(dir.path(), dir.path().join("Shows/loop")).unwrap();

        let result = Walker::default().walk(dir.path()).unwrap();
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].episode_count(), 1);
    }
}
