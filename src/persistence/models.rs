//! Row shapes returned by the PostgreSQL queries and their conversion into
//! domain records.

use chrono::{DateTime, Utc};

use super::StoreError;
use crate::domain::{BoardGame, BoardGameImage, CoverThumbnail, ImageMetadata, ImageType};

/// `id, name, min_players, max_players, play_time, min_age, description,
/// created_at, updated_at` from `board_games`.
pub type BoardGameRow = (
    i64,
    String,
    i32,
    i32,
    i32,
    i32,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// `id, board_game_id, image_data, image_mime_type, thumbnail_data,
/// image_type, display_order, uploaded_at` from `board_game_images`.
pub type BoardGameImageRow = (
    i64,
    i64,
    Vec<u8>,
    String,
    Vec<u8>,
    String,
    i32,
    DateTime<Utc>,
);

/// `id, board_game_id, thumbnail_data, image_mime_type, image_type` from
/// `board_game_images`.
pub type CoverThumbnailRow = (i64, i64, Vec<u8>, String, String);

/// `id, board_game_id, image_type, image_mime_type, display_order,
/// octet_length(image_data), octet_length(thumbnail_data), uploaded_at` from
/// `board_game_images`.
pub type ImageMetadataRow = (i64, i64, String, String, i32, i64, i64, DateTime<Utc>);

/// Converts a `board_games` row into a [`BoardGame`] with no derived image
/// fields.
#[must_use]
pub fn board_game_from_row(row: BoardGameRow) -> BoardGame {
    let (
        id,
        name,
        min_players,
        max_players,
        play_time,
        min_age,
        description,
        created_at,
        updated_at,
    ) = row;
    BoardGame {
        id,
        name,
        min_players,
        max_players,
        play_time,
        min_age,
        description,
        image_ids: Vec::new(),
        cover_image_url: None,
        created_at,
        updated_at,
    }
}

/// Converts a `board_game_images` row into a [`BoardGameImage`].
///
/// # Errors
///
/// Returns [`StoreError::QueryFailed`] if the stored `image_type` is not a
/// known variant.
pub fn image_from_row(row: BoardGameImageRow) -> Result<BoardGameImage, StoreError> {
    let (
        id,
        board_game_id,
        image_data,
        image_mime_type,
        thumbnail_data,
        image_type,
        display_order,
        uploaded_at,
    ) = row;
    Ok(BoardGameImage {
        id,
        board_game_id,
        image_data,
        image_mime_type,
        thumbnail_data,
        image_type: parse_stored_image_type(&image_type)?,
        display_order,
        uploaded_at,
    })
}

/// Converts a metadata projection row into an [`ImageMetadata`].
///
/// # Errors
///
/// Returns [`StoreError::QueryFailed`] if the stored `image_type` is not a
/// known variant.
pub fn metadata_from_row(row: ImageMetadataRow) -> Result<ImageMetadata, StoreError> {
    let (
        id,
        board_game_id,
        image_type,
        image_mime_type,
        display_order,
        size_bytes,
        thumbnail_size_bytes,
        uploaded_at,
    ) = row;
    Ok(ImageMetadata {
        id,
        board_game_id,
        image_type: parse_stored_image_type(&image_type)?,
        image_mime_type,
        display_order,
        size_bytes,
        thumbnail_size_bytes,
        uploaded_at,
    })
}

/// Converts a cover projection row into a [`CoverThumbnail`].
///
/// # Errors
///
/// Returns [`StoreError::QueryFailed`] if the stored `image_type` is not a
/// known variant.
pub fn cover_from_row(row: CoverThumbnailRow) -> Result<CoverThumbnail, StoreError> {
    let (id, board_game_id, thumbnail_data, image_mime_type, image_type) = row;
    Ok(CoverThumbnail {
        id,
        board_game_id,
        thumbnail_data,
        image_mime_type,
        image_type: parse_stored_image_type(&image_type)?,
    })
}

fn parse_stored_image_type(raw: &str) -> Result<ImageType, StoreError> {
    raw.parse()
        .map_err(|e: crate::domain::ParseImageTypeError| StoreError::QueryFailed(e.to_string()))
}
