//! API error type with HTTP status code mapping.
//!
//! [`ShelfError`] is the only place where store and thumbnail failures
//! are translated into HTTP statuses. Every variant renders as
//! `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::StoreError;
use crate::thumbnail::ThumbnailError;

/// JSON error response body.
///
/// ```json
/// { "error": "Board game not found" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Request-level error enum with HTTP status code mapping.
///
/// | Variant      | HTTP Status               |
/// |--------------|---------------------------|
/// | `Validation` | 400 Bad Request           |
/// | `NotFound`   | 404 Not Found             |
/// | `Storage`    | 500 Internal Server Error |
/// | `Thumbnail`  | 400 if too large, else 500 |
/// | `Internal`   | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// Bad or missing client input.
    #[error("{0}")]
    Validation(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The uploaded bytes could not be turned into a thumbnail.
    #[error("thumbnail error: {0}")]
    Thumbnail(#[from] ThumbnailError),

    /// Any other server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    /// Maps a store error, turning [`StoreError::NotFound`] into
    /// [`ShelfError::NotFound`] with the given message.
    #[must_use]
    pub fn from_store(err: StoreError, not_found_message: &str) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(not_found_message.to_string()),
            other => Self::Storage(other),
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Thumbnail(ThumbnailError::TooLarge { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Thumbnail(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message exposed to clients. Server-side details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Storage(_) => "Database operation failed".to_string(),
            Self::Thumbnail(ThumbnailError::TooLarge { .. }) => {
                "Image dimensions too large".to_string()
            }
            Self::Thumbnail(_) => "Failed to generate thumbnail".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, axum::Json(body)).into_response()
    }
}
