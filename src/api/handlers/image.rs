//! Image handlers: upload with thumbnailing, cover thumbnail, listing,
//! deletion.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use super::parse_id;
use crate::api::dto::{ImageListParams, ImageSummaryDto, UploadImageForm, UploadImageResponse};
use crate::app_state::AppState;
use crate::domain::{ImageType, NewBoardGameImage};
use crate::error::{ErrorResponse, ShelfError};
use crate::thumbnail::{ThumbnailFormat, generate_thumbnail};

/// Largest accepted image upload, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for the upload route. Leaves room for multipart
/// framing so an oversized file is still read and rejected with 400.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// `Cache-Control` value sent with cover thumbnails.
pub const COVER_CACHE_CONTROL: &str = "public, max-age=86400";

/// Raw multipart fields collected from an upload request.
#[derive(Debug, Default)]
struct UploadParts {
    image: Option<(Bytes, Option<String>)>,
    image_type: Option<String>,
    display_order: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadParts, ShelfError> {
    let mut parts = UploadParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ShelfError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ShelfError::Validation(format!("Failed to read image: {e}")))?;
                parts.image = Some((data, content_type));
            }
            "imageType" => {
                parts.image_type = Some(field.text().await.map_err(|e| {
                    ShelfError::Validation(format!("Failed to read imageType: {e}"))
                })?);
            }
            "displayOrder" => {
                parts.display_order = Some(field.text().await.map_err(|e| {
                    ShelfError::Validation(format!("Failed to read displayOrder: {e}"))
                })?);
            }
            _ => {}
        }
    }

    Ok(parts)
}

/// `POST /api/boardgame/{id}/images` — Upload an image and store its
/// thumbnail.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] when a precondition fails,
/// [`ShelfError::NotFound`] when the board game does not exist, and a
/// server-side variant if thumbnailing or storage fails.
#[utoipa::path(
    post,
    path = "/api/boardgame/{id}/images",
    tag = "Images",
    summary = "Upload an image",
    description = "Accepts a multipart form with an `image` file (image/*, at most 10 MiB), an `imageType` of `cover` or `gameplay`, and an optional integer `displayOrder`. A 300 px wide thumbnail is generated before the image is stored.",
    params(
        ("id" = i64, Path, description = "Board game id"),
    ),
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 404, description = "Board game not found", body = ErrorResponse),
        (status = 500, description = "Thumbnail or storage failure", body = ErrorResponse),
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ShelfError> {
    let board_game_id = parse_id(&raw_id)?;
    let parts = read_upload(multipart).await?;

    let (data, content_type) = parts
        .image
        .ok_or_else(|| ShelfError::Validation("No image provided".to_string()))?;

    let image_type: ImageType = parts
        .image_type
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .parse()
        .map_err(|_| ShelfError::Validation("Invalid image type".to_string()))?;

    if data.len() > MAX_IMAGE_BYTES {
        return Err(ShelfError::Validation(
            "File too large (max 10MB)".to_string(),
        ));
    }

    let mime_type = content_type
        .filter(|ct| ct.starts_with("image/"))
        .ok_or_else(|| ShelfError::Validation("File must be an image".to_string()))?;

    let display_order = match parts.display_order.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(raw) => raw
            .parse()
            .map_err(|_| ShelfError::Validation("Invalid display order".to_string()))?,
    };

    let thumbnail_mime = mime_type.clone();
    let (data, thumbnail) = tokio::task::spawn_blocking(move || {
        generate_thumbnail(&data, &thumbnail_mime).map(|thumbnail| (data, thumbnail))
    })
    .await
    .map_err(|e| ShelfError::Internal(format!("thumbnail task failed: {e}")))??;

    let image = state
        .images
        .save_image(NewBoardGameImage {
            board_game_id,
            image_data: data.to_vec(),
            image_mime_type: mime_type,
            thumbnail_data: thumbnail,
            image_type,
            display_order,
        })
        .await
        .map_err(|e| ShelfError::from_store(e, "Board game not found"))?;

    tracing::info!(
        board_game_id,
        image_id = image.id,
        image_type = %image.image_type,
        bytes = image.image_data.len(),
        "image uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse {
            message: "Image uploaded successfully".to_string(),
            image_id: image.id,
        }),
    ))
}

/// `GET /api/boardgame/{id}/images/cover` — Serve the cover thumbnail.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] for a non-numeric id and
/// [`ShelfError::NotFound`] when the game has no cover image.
#[utoipa::path(
    get,
    path = "/api/boardgame/{id}/images/cover",
    tag = "Images",
    summary = "Get the cover thumbnail",
    description = "Returns the raw thumbnail bytes of the board game's cover image. When several covers exist, the lowest displayOrder wins.",
    params(
        ("id" = i64, Path, description = "Board game id"),
    ),
    responses(
        (status = 200, description = "Thumbnail bytes", content_type = "image/*"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Cover image not found", body = ErrorResponse),
    )
)]
pub async fn get_cover_image(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ShelfError> {
    let board_game_id = parse_id(&raw_id)?;

    let cover = state
        .images
        .get_cover_thumbnail(board_game_id)
        .await
        .map_err(|e| ShelfError::from_store(e, "Cover image not found"))?;

    let content_type = ThumbnailFormat::for_mime(&cover.image_mime_type).content_type();
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, COVER_CACHE_CONTROL),
        ],
        cover.thumbnail_data,
    ))
}

/// `GET /api/boardgame/{id}/images` — List image metadata.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] for a non-numeric id or unknown
/// `type`, and [`ShelfError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/boardgame/{id}/images",
    tag = "Images",
    summary = "List images of a board game",
    description = "Returns image metadata ordered by displayOrder. Image bytes are never included.",
    params(
        ("id" = i64, Path, description = "Board game id"),
        ImageListParams,
    ),
    responses(
        (status = 200, description = "Image metadata", body = Vec<ImageSummaryDto>),
        (status = 400, description = "Invalid id or type", body = ErrorResponse),
    )
)]
pub async fn list_images(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<ImageListParams>,
) -> Result<impl IntoResponse, ShelfError> {
    let board_game_id = parse_id(&raw_id)?;
    let image_type = params
        .image_type
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<ImageType>)
        .transpose()
        .map_err(|e| ShelfError::Validation(e.to_string()))?;

    let images = state
        .images
        .list_image_metadata(board_game_id, image_type)
        .await?;

    let summaries: Vec<ImageSummaryDto> = images.iter().map(ImageSummaryDto::from).collect();
    Ok(Json(summaries))
}

/// `DELETE /api/images/{image_id}` — Delete an image.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] for a non-numeric id and
/// [`ShelfError::Storage`] on database failure.
#[utoipa::path(
    delete,
    path = "/api/images/{image_id}",
    tag = "Images",
    summary = "Delete an image",
    description = "Deletes an image by id. Deleting an image that does not exist also returns 204.",
    params(
        ("image_id" = i64, Path, description = "Image id"),
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ShelfError> {
    let image_id = parse_id(&raw_id)?;
    state.images.delete_image(image_id).await?;
    tracing::info!(image_id, "image deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Image routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/boardgame/{id}/images",
            get(list_images)
                .post(upload_image)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/boardgame/{id}/images/cover", get(get_cover_image))
        .route("/images/{image_id}", delete(delete_image))
}
