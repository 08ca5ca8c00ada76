//! Season folder and episode file classification.
//!
//! Both classifiers are ordered pattern tables evaluated first-match-wins.
//! Each table entry is a tagged variant so callers (and tests) can see which
//! rule fired and the tables can be extended without touching the walker.
//!
//! ## Season folders
//!
//! | Variant              | Example          |
//! |----------------------|------------------|
//! | `SPrefix`            | `S02`            |
//! | `Season`             | `Season 2`       |
//! | `Temporada`          | `Temporada 2`    |
//! | `OrdinalTemporada`   | `2ª Temporada`   |
//! | `BareNumber`         | `02`             |
//!
//! ## Episode files
//!
//! | Variant          | Example            | Captures           |
//! |------------------|--------------------|--------------------|
//! | `SeasonEpisode`  | `S01E05.mkv`       | season, episode    |
//! | `Episodio`       | `Episodio 5.mp4`   | episode            |
//! | `Ep`             | `ep5.mp4`          | episode            |
//! | `Cross`          | `1x05.avi`         | season, episode    |
//! | `Bracketed`      | `[1 05].mkv`       | season, episode    |
//! | `LeadingPair`    | `1 05 Pilot.mkv`   | season, episode    |
//! | `EpisodioAccent` | `Episódio 5.mkv`   | episode            |
//! | `NumericStem`    | `05.mkv`           | episode (1..=99)   |

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ---------- Season patterns ----------

static SEASON_S_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^s(\d{1,3})\b").unwrap());

static SEASON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseason[\s._-]*(\d{1,3})\b").unwrap());

static SEASON_TEMPORADA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btemporada[\s._-]*(\d{1,3})\b").unwrap());

static SEASON_ORDINAL_TEMPORADA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{1,2})\s*[ªº°]?\s*temporada\b").unwrap());

static SEASON_BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})$").unwrap());

// ---------- Episode patterns ----------

static EP_SEASON_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z0-9])s(\d{1,3})[\s._-]?e(\d{1,4})").unwrap());

static EP_EPISODIO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bepisodio[\s._-]*(\d{1,4})").unwrap());

static EP_EP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bep(?:isode)?[\s._-]*(\d{1,4})\b").unwrap());

static EP_CROSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{1,3})\b").unwrap());

static EP_BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{1,2})[\s._-]+(\d{1,3})\]").unwrap());

static EP_LEADING_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[\s.](\d{2,3})\b").unwrap());

static EP_EPISODIO_ACCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)epis[óÓ]dio[\s._-]*(\d{1,4})").unwrap());

/// Highest bare-stem number treated as an episode.
const MAX_NUMERIC_STEM: u32 = 99;

/// A season-folder naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeasonPattern {
    SPrefix,
    Season,
    Temporada,
    OrdinalTemporada,
    BareNumber,
}

impl SeasonPattern {
    /// Evaluation order. Earlier entries win.
    pub const ORDERED: [SeasonPattern; 5] = [
        Self::SPrefix,
        Self::Season,
        Self::Temporada,
        Self::OrdinalTemporada,
        Self::BareNumber,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            Self::SPrefix => &SEASON_S_PREFIX,
            Self::Season => &SEASON_WORD,
            Self::Temporada => &SEASON_TEMPORADA,
            Self::OrdinalTemporada => &SEASON_ORDINAL_TEMPORADA,
            Self::BareNumber => &SEASON_BARE_NUMBER,
        }
    }
}

/// An episode-file naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpisodePattern {
    SeasonEpisode,
    Episodio,
    Ep,
    Cross,
    Bracketed,
    LeadingPair,
    EpisodioAccent,
    /// Fallback: the whole stem is a number in `1..=99`.
    NumericStem,
}

impl EpisodePattern {
    /// Evaluation order of the regex-backed patterns. Earlier entries win;
    /// `NumericStem` is tried only after all of these miss.
    pub const ORDERED: [EpisodePattern; 7] = [
        Self::SeasonEpisode,
        Self::Episodio,
        Self::Ep,
        Self::Cross,
        Self::Bracketed,
        Self::LeadingPair,
        Self::EpisodioAccent,
    ];

    fn regex(self) -> Option<&'static Regex> {
        match self {
            Self::SeasonEpisode => Some(&EP_SEASON_EPISODE),
            Self::Episodio => Some(&EP_EPISODIO),
            Self::Ep => Some(&EP_EP),
            Self::Cross => Some(&EP_CROSS),
            Self::Bracketed => Some(&EP_BRACKETED),
            Self::LeadingPair => Some(&EP_LEADING_PAIR),
            Self::EpisodioAccent => Some(&EP_EPISODIO_ACCENT),
            Self::NumericStem => None,
        }
    }

    /// Whether the pattern captures a season number as well.
    pub fn encodes_season(self) -> bool {
        matches!(
            self,
            Self::SeasonEpisode | Self::Cross | Self::Bracketed | Self::LeadingPair
        )
    }
}

/// A positive season number recognised in a folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonMatch {
    pub number: u32,
    pub pattern: SeasonPattern,
}

/// An episode recognised in a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeMatch {
    pub episode: u32,
    /// Season encoded in the file name, if the pattern carries one.
    pub season: Option<u32>,
    pub pattern: EpisodePattern,
}

/// Season 0 and unnumbered content fold into season 1.
fn normalize_season(n: u32) -> u32 {
    n.max(1)
}

fn capture_u32(caps: &regex::Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

/// Decide whether a folder name denotes a season.
///
/// Returns `None` when no pattern matches.
///
/// # Examples
///
/// ```
/// use vidshelf::scanner::classifier::classify_season_folder;
///
/// assert_eq!(classify_season_folder("Temporada 2").map(|m| m.number), Some(2));
/// assert_eq!(classify_season_folder("2ª Temporada").map(|m| m.number), Some(2));
/// assert!(classify_season_folder("Breaking Bad").is_none());
/// ```
pub fn classify_season_folder(name: &str) -> Option<SeasonMatch> {
    let name = name.trim();
    SeasonPattern::ORDERED.iter().find_map(|&pattern| {
        let caps = pattern.regex().captures(name)?;
        let number = capture_u32(&caps, 1)?;
        Some(SeasonMatch {
            number: normalize_season(number),
            pattern,
        })
    })
}

/// Decide whether a file name denotes an episode.
///
/// The extension is ignored. The first matching pattern wins; if it yields
/// episode 0 the file is treated as unclassified. When no pattern matches, a
/// purely numeric stem in `1..=99` is taken as the episode number.
///
/// # Examples
///
/// ```
/// use vidshelf::scanner::classifier::classify_episode_file;
///
/// let m = classify_episode_file("S01E05.mkv").unwrap();
/// assert_eq!((m.season, m.episode), (Some(1), 5));
///
/// let m = classify_episode_file("05.mkv").unwrap();
/// assert_eq!((m.season, m.episode), (None, 5));
///
/// assert!(classify_episode_file("trailer.mkv").is_none());
/// ```
pub fn classify_episode_file(name: &str) -> Option<EpisodeMatch> {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .trim();

    for pattern in EpisodePattern::ORDERED {
        let Some(caps) = pattern.regex().and_then(|re| re.captures(stem)) else {
            continue;
        };
        let (season, episode) = if pattern.encodes_season() {
            (capture_u32(&caps, 1).map(normalize_season), capture_u32(&caps, 2))
        } else {
            (None, capture_u32(&caps, 1))
        };
        return match episode {
            Some(episode) if episode > 0 => Some(EpisodeMatch {
                episode,
                season,
                pattern,
            }),
            _ => None,
        };
    }

    numeric_stem(stem).map(|episode| EpisodeMatch {
        episode,
        season: None,
        pattern: EpisodePattern::NumericStem,
    })
}

fn numeric_stem(stem: &str) -> Option<u32> {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_NUMERIC_STEM).contains(n))
}
