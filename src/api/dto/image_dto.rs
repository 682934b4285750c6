//! Image upload and listing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ImageMetadata, ImageType};

/// Response body for `POST /api/boardgame/{id}/images` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponse {
    /// Confirmation message.
    pub message: String,
    /// Identifier of the stored image.
    #[serde(rename = "imageId")]
    pub image_id: i64,
}

/// Multipart form accepted by the upload endpoint (documentation only).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadImageForm {
    /// Image file, at most 10 MiB, with an `image/*` content type.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// `cover` or `gameplay`.
    #[serde(rename = "imageType")]
    pub image_type: ImageType,
    /// Optional ordering among images of the same game (default 0).
    #[serde(rename = "displayOrder")]
    pub display_order: Option<i32>,
}

/// Query parameters for `GET /api/boardgame/{id}/images`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageListParams {
    /// Restricts the listing to one image type (`cover` or `gameplay`).
    #[serde(rename = "type")]
    pub image_type: Option<String>,
}

/// Image metadata returned by the listing endpoint. Never carries bytes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageSummaryDto {
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

impl From<&ImageMetadata> for ImageSummaryDto {
    fn from(image: &ImageMetadata) -> Self {
        Self {
            id: image.id,
            board_game_id: image.board_game_id,
            image_type: image.image_type,
            image_mime_type: image.image_mime_type.clone(),
            display_order: image.display_order,
            size_bytes: image.size_bytes,
            thumbnail_size_bytes: image.thumbnail_size_bytes,
            uploaded_at: image.uploaded_at,
        }
    }
}
