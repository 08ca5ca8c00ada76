//! Core type definitions shared between the catalog and the artwork store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of series/episode artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    /// Primary poster image.
    Poster,
    /// Background/backdrop image.
    Backdrop,
    /// Episode still frame.
    Still,
}

impl ImageCategory {
    /// All categories, in display order.
    pub const ALL: [ImageCategory; 3] = [Self::Poster, Self::Backdrop, Self::Still];
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poster => write!(f, "poster"),
            Self::Backdrop => write!(f, "backdrop"),
            Self::Still => write!(f, "still"),
        }
    }
}

impl std::str::FromStr for ImageCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poster" => Ok(Self::Poster),
            "backdrop" => Ok(Self::Backdrop),
            "still" => Ok(Self::Still),
            other => Err(crate::Error::invalid_input(format!(
                "unknown image category: {other}"
            ))),
        }
    }
}
