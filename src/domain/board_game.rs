//! Board game catalog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted board game.
///
/// `image_ids` and `cover_image_url` are derived from the image store and
/// are only populated on single-game lookups; they are never written to
/// the `board_games` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BoardGame {
    /// Server-generated identifier (immutable after creation).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Minimum number of players.
    pub min_players: i32,
    /// Maximum number of players, `0` when there is no ceiling.
    pub max_players: i32,
    /// Typical play time in minutes.
    pub play_time: i32,
    /// Minimum recommended player age.
    pub min_age: i32,
    /// Free-form description.
    pub description: String,
    /// Identifiers of every image attached to this game.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_ids: Vec<i64>,
    /// URL of the cover thumbnail, when a cover image exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp (equal to `created_at` until updates exist).
    pub updated_at: DateTime<Utc>,
}

/// Validated input for [`crate::persistence::BoardGameStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoardGame {
    /// Display name, non-empty.
    pub name: String,
    /// Minimum number of players, positive.
    pub min_players: i32,
    /// Maximum number of players, `0` for unspecified.
    pub max_players: i32,
    /// Play time in minutes, positive.
    pub play_time: i32,
    /// Minimum age, positive.
    pub min_age: i32,
    /// Description, non-empty.
    pub description: String,
}

/// Path of the cover thumbnail endpoint for the given board game.
#[must_use]
pub fn cover_image_url(board_game_id: i64) -> String {
    format!("/api/boardgame/{board_game_id}/images/cover")
}
