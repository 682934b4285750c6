//! Binary image assets attached to a board game.

use chrono::{DateTime, Utc};

use super::ImageType;

/// A stored image row, full-resolution bytes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGameImage {
    /// Server-generated identifier.
    pub id: i64,
    /// Owning board game.
    pub board_game_id: i64,
    /// Raw uploaded bytes.
    pub image_data: Vec<u8>,
    /// Content type of the upload (e.g. `image/png`).
    pub image_mime_type: String,
    /// Thumbnail computed once at upload time.
    pub thumbnail_data: Vec<u8>,
    /// Cover or gameplay.
    pub image_type: ImageType,
    /// Caller-supplied ordering among images of the same game.
    pub display_order: i32,
    /// Server-set upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Input for [`crate::persistence::BoardGameImageStore::save_image`].
///
/// The thumbnail must already be generated; stores never compute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoardGameImage {
    /// Owning board game.
    pub board_game_id: i64,
    /// Raw uploaded bytes.
    pub image_data: Vec<u8>,
    /// Content type of the upload.
    pub image_mime_type: String,
    /// Precomputed thumbnail bytes.
    pub thumbnail_data: Vec<u8>,
    /// Cover or gameplay.
    pub image_type: ImageType,
    /// Ordering among images of the same game.
    pub display_order: i32,
}

/// Lightweight cover projection that never carries `image_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverThumbnail {
    /// Image identifier.
    pub id: i64,
    /// Owning board game.
    pub board_game_id: i64,
    /// Thumbnail bytes.
    pub thumbnail_data: Vec<u8>,
    /// Content type of the original upload.
    pub image_mime_type: String,
    /// Always [`ImageType::Cover`] for rows returned by the cover query.
    pub image_type: ImageType,
}

impl From<&BoardGameImage> for CoverThumbnail {
    fn from(image: &BoardGameImage) -> Self {
        Self {
            id: image.id,
            board_game_id: image.board_game_id,
            thumbnail_data: image.thumbnail_data.clone(),
            image_mime_type: image.image_mime_type.clone(),
            image_type: image.image_type,
        }
    }
}

/// Image row without its bytes, carrying only their sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Image identifier.
    pub id: i64,
    /// Owning board game.
    pub board_game_id: i64,
    /// Cover or gameplay.
    pub image_type: ImageType,
    /// Content type of the original upload.
    pub image_mime_type: String,
    /// Ordering among images of the same game.
    pub display_order: i32,
    /// Size of the original upload in bytes.
    pub size_bytes: i64,
    /// Size of the stored thumbnail in bytes.
    pub thumbnail_size_bytes: i64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

impl From<&BoardGameImage> for ImageMetadata {
    fn from(image: &BoardGameImage) -> Self {
        Self {
            id: image.id,
            board_game_id: image.board_game_id,
            image_type: image.image_type,
            image_mime_type: image.image_mime_type.clone(),
            display_order: image.display_order,
            size_bytes: i64::try_from(image.image_data.len()).unwrap_or(i64::MAX),
            thumbnail_size_bytes: i64::try_from(image.thumbnail_data.len()).unwrap_or(i64::MAX),
            uploaded_at: image.uploaded_at,
        }
    }
}
