//! Persistence layer: store contracts for board games and their images.
//!
//! Handlers only ever see the [`BoardGameStore`] and [`BoardGameImageStore`]
//! traits. The PostgreSQL implementations in [`postgres`] are wired in at
//! startup; [`memory`] provides an instance-scoped implementation used by
//! tests and local experiments.
//!
//! Stores never log. They return [`StoreError`] and leave the mapping to
//! HTTP statuses to the API layer.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    BoardGame, BoardGameImage, CoverThumbnail, ImageMetadata, ImageType, NewBoardGame,
    NewBoardGameImage,
};

pub use memory::InMemoryStore;
pub use postgres::{PostgresBoardGameStore, PostgresImageStore};

/// Failure reported by a store.
///
/// Callers branch on the variant, never on the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No row matched the request.
    #[error("record not found")]
    NotFound,

    /// The database rejected or failed to execute a statement.
    #[error("database query failed: {0}")]
    QueryFailed(String),

    /// The database could not be reached (pool exhausted, closed, or I/O).
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err.to_string()),
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

/// CRUD contract for the `board_games` table.
#[async_trait]
pub trait BoardGameStore: Send + Sync + fmt::Debug {
    /// Inserts a board game and returns it with `id` and timestamps set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QueryFailed`] or [`StoreError::Unavailable`]
    /// on database failure.
    async fn create(&self, game: NewBoardGame) -> Result<BoardGame, StoreError>;

    /// Returns every board game ordered by ascending `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QueryFailed`] or [`StoreError::Unavailable`]
    /// on database failure.
    async fn get_all(&self) -> Result<Vec<BoardGame>, StoreError>;

    /// Returns the board game with the given `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row matches, or a database
    /// failure variant otherwise.
    async fn get_by_id(&self, id: i64) -> Result<BoardGame, StoreError>;

    /// Hard-deletes the board game with the given `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row was affected, or a
    /// database failure variant otherwise.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Checks that the backing database is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] or [`StoreError::QueryFailed`]
    /// when the check fails.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Contract for the `board_game_images` table.
#[async_trait]
pub trait BoardGameImageStore: Send + Sync + fmt::Debug {
    /// Persists an image together with its precomputed thumbnail.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the referenced board game does
    /// not exist, or a database failure variant otherwise.
    async fn save_image(&self, image: NewBoardGameImage) -> Result<BoardGameImage, StoreError>;

    /// Returns the images of a board game ordered by `display_order`, then
    /// `id`. `None` returns every image type.
    ///
    /// # Errors
    ///
    /// Returns a database failure variant on error.
    async fn get_all_images_for_board_game(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<BoardGameImage>, StoreError>;

    /// Same selection and ordering as
    /// [`BoardGameImageStore::get_all_images_for_board_game`], but only byte
    /// sizes are read; neither the image nor the thumbnail is fetched.
    ///
    /// # Errors
    ///
    /// Returns a database failure variant on error.
    async fn list_image_metadata(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<ImageMetadata>, StoreError>;

    /// Returns the cover thumbnail of a board game without the full image.
    ///
    /// When several covers exist the one with the lowest `display_order`
    /// wins, ties broken by the lowest `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the game has no cover image, or
    /// a database failure variant otherwise.
    async fn get_cover_thumbnail(&self, board_game_id: i64) -> Result<CoverThumbnail, StoreError>;

    /// Deletes an image by id. Deleting a missing image is not an error.
    ///
    /// # Errors
    ///
    /// Returns a database failure variant on error.
    async fn delete_image(&self, id: i64) -> Result<(), StoreError>;
}
