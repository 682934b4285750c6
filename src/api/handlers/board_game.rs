//! Board game CRUD handlers: create, list, get, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::parse_id;
use crate::api::dto::CreateBoardGameRequest;
use crate::app_state::AppState;
use crate::domain::{BoardGame, ImageType, cover_image_url};
use crate::error::{ErrorResponse, ShelfError};

const NOT_FOUND: &str = "Board game not found";

/// `POST /api/boardgame` — Create a board game.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] on malformed JSON or missing fields,
/// and [`ShelfError::Storage`] if the insert fails.
#[utoipa::path(
    post,
    path = "/api/boardgame",
    tag = "Board games",
    summary = "Create a board game",
    description = "Validates the body and inserts a new catalog entry. `max_players` may be omitted or 0 for no ceiling.",
    request_body = CreateBoardGameRequest,
    responses(
        (status = 201, description = "Board game created", body = BoardGame),
        (status = 400, description = "Malformed JSON or missing field", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse),
    )
)]
pub async fn create_board_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateBoardGameRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ShelfError> {
    let Json(req) = payload.map_err(|rejection| ShelfError::Validation(rejection.body_text()))?;
    let new_game = req.validate()?;

    let game = state.board_games.create(new_game).await?;
    tracing::info!(id = game.id, name = %game.name, "board game created");

    Ok((StatusCode::CREATED, Json(game)))
}

/// `GET /api/boardgames` — List every board game.
///
/// # Errors
///
/// Returns [`ShelfError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/boardgames",
    tag = "Board games",
    summary = "List board games",
    description = "Returns all board games ordered by ascending id. An empty catalog yields `[]`.",
    responses(
        (status = 200, description = "All board games", body = Vec<BoardGame>),
        (status = 500, description = "Database failure", body = ErrorResponse),
    )
)]
pub async fn list_board_games(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ShelfError> {
    let games = state.board_games.get_all().await?;
    Ok(Json(games))
}

/// `GET /api/boardgames/{id}` — Get one board game with its image ids.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] for a non-numeric id and
/// [`ShelfError::NotFound`] if the game does not exist.
#[utoipa::path(
    get,
    path = "/api/boardgames/{id}",
    tag = "Board games",
    summary = "Get a board game",
    description = "Returns a single board game including the ids of its images and, when a cover exists, the cover thumbnail URL.",
    params(
        ("id" = i64, Path, description = "Board game id"),
    ),
    responses(
        (status = 200, description = "Board game", body = BoardGame),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Board game not found", body = ErrorResponse),
    )
)]
pub async fn get_board_game(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ShelfError> {
    let id = parse_id(&raw_id)?;

    let mut game = state
        .board_games
        .get_by_id(id)
        .await
        .map_err(|e| ShelfError::from_store(e, NOT_FOUND))?;

    let images = state.images.list_image_metadata(id, None).await?;
    game.image_ids = images.iter().map(|image| image.id).collect();
    if images.iter().any(|image| image.image_type == ImageType::Cover) {
        game.cover_image_url = Some(cover_image_url(id));
    }

    Ok(Json(game))
}

/// `DELETE /api/boardgames/{id}` — Delete a board game.
///
/// # Errors
///
/// Returns [`ShelfError::Validation`] for a non-numeric id and
/// [`ShelfError::NotFound`] if the game does not exist.
#[utoipa::path(
    delete,
    path = "/api/boardgames/{id}",
    tag = "Board games",
    summary = "Delete a board game",
    description = "Hard-deletes a board game. Its images are removed by the database cascade.",
    params(
        ("id" = i64, Path, description = "Board game id"),
    ),
    responses(
        (status = 204, description = "Board game deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Board game not found", body = ErrorResponse),
    )
)]
pub async fn delete_board_game(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ShelfError> {
    let id = parse_id(&raw_id)?;

    state
        .board_games
        .delete(id)
        .await
        .map_err(|e| ShelfError::from_store(e, NOT_FOUND))?;
    tracing::info!(id, "board game deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Board game routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boardgame", post(create_board_game))
        .route("/boardgames", get(list_board_games))
        .route(
            "/boardgames/{id}",
            get(get_board_game).delete(delete_board_game),
        )
}
