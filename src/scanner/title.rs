//! Series title cleanup for folder names.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").unwrap());

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._]+").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Tokens that end the title part of a release-style name.
static NOISE_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:
            s\d{1,3}(?:\s?e\d{1,4})?
          | (?:season|temporada)\s*\d{1,3}
          | \d{1,2}\s*[ªº°]?\s*temporada
          | \d{1,2}x\d{1,3}
          | (?:episodio|episode|ep)\s*\d{1,4}
          | 2160p | 1080p | 1080i | 720p | 576p | 480p | 4k | uhd
          | hdr10\+? | hdr | dv | sdr | 10bit | 8bit
          | x26[45] | h\s?26[45] | hevc | avc | xvid | divx | av1
          | web(?:[\s-]?dl)? | webrip | blu[\s-]?ray | bdrip | brrip | dvdrip | hdtv | remux
          | aac(?:\s?2\s?0)? | ac3 | eac3 | dts(?:[\s-]?hd)? | truehd | atmos | ddp?\s?5\s?1
          | proper | repack | complete | multi | dual(?:[\s-]?audio)?
        )\b
        |
        epis[óÓ]dio\s*\d{1,4}",
    )
    .unwrap()
});

static TRAILING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(((?:19|20)\d{2})\)\s*$").unwrap());

/// Extract a cleaned series title from a folder name.
///
/// Strips bracketed and parenthesised qualifiers, season/episode tokens and
/// resolution/codec/audio tags, and turns separators into spaces. A release
/// name is cut at its first noise token. When the cleaned result is empty,
/// pure digits or a single character, a lighter normalization of the
/// original name is returned instead.
///
/// # Examples
///
/// ```
/// use vidshelf::scanner::title::extract_series_title;
///
/// assert_eq!(extract_series_title("Breaking Bad (2008)"), "Breaking Bad");
/// assert_eq!(extract_series_title("The.Wire.S01.1080p.BluRay.x264-GROUP"), "The Wire");
/// assert_eq!(extract_series_title("24"), "24");
/// ```
pub fn extract_series_title(name: &str) -> String {
    let cleaned = aggressive_clean(name);
    if is_over_stripped(&cleaned) {
        let light = light_normalize(name);
        if light.is_empty() {
            return name.trim().to_string();
        }
        return light;
    }
    cleaned
}

/// Extract a trailing `(YYYY)` year hint from a folder name.
///
/// Only years in 1900..=2099 are accepted.
///
/// # Examples
///
/// ```
/// use vidshelf::scanner::title::extract_year_hint;
///
/// assert_eq!(extract_year_hint("Doctor Who (2005)"), Some(2005));
/// assert_eq!(extract_year_hint("Doctor Who"), None);
/// ```
pub fn extract_year_hint(name: &str) -> Option<u16> {
    TRAILING_YEAR
        .captures(name.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn aggressive_clean(name: &str) -> String {
    let without_groups = BRACKETED.replace_all(name, " ");
    let spaced = SEPARATORS.replace_all(&without_groups, " ");

    // Cut at the first noise token unless the name starts with one.
    let truncated = match NOISE_TOKENS.find(&spaced) {
        Some(m) if m.start() > 0 && !spaced[..m.start()].trim().is_empty() => {
            spaced[..m.start()].to_string()
        }
        _ => spaced.to_string(),
    };
    let stripped = NOISE_TOKENS.replace_all(&truncated, " ");

    tidy(&stripped)
}

fn light_normalize(name: &str) -> String {
    tidy(&SEPARATORS.replace_all(name, " "))
}

/// Collapse whitespace and trim dangling separators.
fn tidy(s: &str) -> String {
    WHITESPACE
        .replace_all(s, " ")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | ':' | ',' | '+'))
        .to_string()
}

fn is_over_stripped(title: &str) -> bool {
    title.is_empty() || title.chars().count() == 1 || title.chars().all(|c| c.is_ascii_digit())
}
