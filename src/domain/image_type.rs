//! Image role within a board game's gallery.
//!
//! [`ImageType`] is stored as `TEXT` in `board_game_images.image_type` and
//! travels over the wire as the lowercase strings `"cover"` and
//! `"gameplay"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Designation of an uploaded board game image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Primary image used for list and preview thumbnails.
    Cover,
    /// Additional image showing the game in play.
    Gameplay,
}

impl ImageType {
    /// Returns the canonical lowercase name used on the wire and in the
    /// database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Gameplay => "gameplay",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `"cover"` nor `"gameplay"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid image type: {0:?} (expected \"cover\" or \"gameplay\")")]
pub struct ParseImageTypeError(pub String);

impl FromStr for ImageType {
    type Err = ParseImageTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cover" => Ok(Self::Cover),
            "gameplay" => Ok(Self::Gameplay),
            other => Err(ParseImageTypeError(other.to_string())),
        }
    }
}
