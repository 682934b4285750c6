//! REST endpoint handlers organized by resource.

pub mod board_game;
pub mod image;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::error::ShelfError;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(board_game::routes())
        .merge(image::routes())
}

/// Parses a numeric path id.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] with `"Invalid ID"` when the
/// segment is not a base-10 integer.
pub fn parse_id(raw: &str) -> Result<i64, ShelfError> {
    raw.parse()
        .map_err(|_| ShelfError::Validation("Invalid ID".to_string()))
}
