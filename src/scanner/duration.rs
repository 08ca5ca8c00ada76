//! Heuristic episode duration from file size.
//!
//! Containers are never opened. A nominal bitrate is chosen from the
//! resolution tag in the file name and the size is divided by it.

use serde::{Deserialize, Serialize};

const MIN_MINUTES: u32 = 1;
const MAX_MINUTES: u32 = 600;

/// Nominal resolution class detected from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Uhd,
    FullHd,
    Hd,
    Sd,
}

impl Resolution {
    /// Detect the resolution class from a file name; unknown names are
    /// treated as 1080p.
    pub fn detect(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.contains("2160p") || lower.contains("4k") || lower.contains("uhd") {
            Self::Uhd
        } else if lower.contains("1080p") || lower.contains("1080i") {
            Self::FullHd
        } else if lower.contains("720p") {
            Self::Hd
        } else if lower.contains("480p")
            || lower.contains("576p")
            || lower.contains("dvdrip")
            || lower
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|token| token == "sd")
        {
            Self::Sd
        } else {
            Self::FullHd
        }
    }

    /// Nominal combined bitrate in kilobits per second.
    pub fn nominal_kbps(self) -> u64 {
        match self {
            Self::Uhd => 16_000,
            Self::FullHd => 5_000,
            Self::Hd => 2_500,
            Self::Sd => 1_200,
        }
    }
}

/// Estimate an episode's runtime in whole minutes, clamped to `[1, 600]`.
///
/// # Examples
///
/// ```
/// use vidshelf::scanner::duration::{estimate_duration_minutes, Resolution};
///
/// // 1.5 GB at the 1080p nominal rate is 40 minutes.
/// assert_eq!(estimate_duration_minutes(1_500_000_000, Resolution::FullHd), 40);
/// assert_eq!(estimate_duration_minutes(0, Resolution::Sd), 1);
/// ```
pub fn estimate_duration_minutes(size_bytes: u64, resolution: Resolution) -> u32 {
    let bytes_per_second = resolution.nominal_kbps() * 1000 / 8;
    let seconds = size_bytes as f64 / bytes_per_second as f64;
    let minutes = (seconds / 60.0).round();
    (minutes as u32).clamp(MIN_MINUTES, MAX_MINUTES)
}
