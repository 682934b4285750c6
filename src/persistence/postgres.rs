//! PostgreSQL implementations of the store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{
    BoardGameImageRow, BoardGameRow, CoverThumbnailRow, ImageMetadataRow, board_game_from_row,
    cover_from_row, image_from_row, metadata_from_row,
};
use super::{BoardGameImageStore, BoardGameStore, StoreError};
use crate::domain::{
    BoardGame, BoardGameImage, CoverThumbnail, ImageMetadata, ImageType, NewBoardGame,
    NewBoardGameImage,
};

/// `board_games` store backed by `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBoardGameStore {
    pool: PgPool,
}

impl PostgresBoardGameStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardGameStore for PostgresBoardGameStore {
    async fn create(&self, game: NewBoardGame) -> Result<BoardGame, StoreError> {
        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO board_games \
             (name, min_players, max_players, play_time, min_age, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at, updated_at",
        )
        .bind(&game.name)
        .bind(game.min_players)
        .bind(game.max_players)
        .bind(game.play_time)
        .bind(game.min_age)
        .bind(&game.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(BoardGame {
            id,
            name: game.name,
            min_players: game.min_players,
            max_players: game.max_players,
            play_time: game.play_time,
            min_age: game.min_age,
            description: game.description,
            image_ids: Vec::new(),
            cover_image_url: None,
            created_at,
            updated_at,
        })
    }

    async fn get_all(&self) -> Result<Vec<BoardGame>, StoreError> {
        let rows = sqlx::query_as::<_, BoardGameRow>(
            "SELECT id, name, min_players, max_players, play_time, min_age, description, \
             created_at, updated_at FROM board_games ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(board_game_from_row).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<BoardGame, StoreError> {
        sqlx::query_as::<_, BoardGameRow>(
            "SELECT id, name, min_players, max_players, play_time, min_age, description, \
             created_at, updated_at FROM board_games WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(board_game_from_row)
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM board_games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `board_game_images` store backed by `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresImageStore {
    pool: PgPool,
}

impl PostgresImageStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardGameImageStore for PostgresImageStore {
    async fn save_image(&self, image: NewBoardGameImage) -> Result<BoardGameImage, StoreError> {
        let (id, uploaded_at): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO board_game_images \
             (board_game_id, image_data, image_mime_type, thumbnail_data, \
             image_type, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, uploaded_at",
        )
        .bind(image.board_game_id)
        .bind(&image.image_data)
        .bind(&image.image_mime_type)
        .bind(&image.thumbnail_data)
        .bind(image.image_type.as_str())
        .bind(image.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => StoreError::NotFound,
            other => StoreError::from(other),
        })?;

        Ok(BoardGameImage {
            id,
            board_game_id: image.board_game_id,
            image_data: image.image_data,
            image_mime_type: image.image_mime_type,
            thumbnail_data: image.thumbnail_data,
            image_type: image.image_type,
            display_order: image.display_order,
            uploaded_at,
        })
    }

    async fn get_all_images_for_board_game(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<BoardGameImage>, StoreError> {
        let rows = if let Some(image_type) = image_type {
            sqlx::query_as::<_, BoardGameImageRow>(
                "SELECT id, board_game_id, image_data, image_mime_type, thumbnail_data, \
                 image_type, display_order, uploaded_at FROM board_game_images \
                 WHERE board_game_id = $1 AND image_type = $2 \
                 ORDER BY display_order ASC, id ASC",
            )
            .bind(board_game_id)
            .bind(image_type.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, BoardGameImageRow>(
                "SELECT id, board_game_id, image_data, image_mime_type, thumbnail_data, \
                 image_type, display_order, uploaded_at FROM board_game_images \
                 WHERE board_game_id = $1 \
                 ORDER BY display_order ASC, id ASC",
            )
            .bind(board_game_id)
            .fetch_all(&self.pool)
            .await
        }?;

        rows.into_iter().map(image_from_row).collect()
    }

    async fn list_image_metadata(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<ImageMetadata>, StoreError> {
        let rows = sqlx::query_as::<_, ImageMetadataRow>(
            "SELECT id, board_game_id, image_type, image_mime_type, display_order, \
             octet_length(image_data)::BIGINT, octet_length(thumbnail_data)::BIGINT, \
             uploaded_at FROM board_game_images \
             WHERE board_game_id = $1 AND ($2::TEXT IS NULL OR image_type = $2) \
             ORDER BY display_order ASC, id ASC",
        )
        .bind(board_game_id)
        .bind(image_type.map(ImageType::as_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(metadata_from_row).collect()
    }

    async fn get_cover_thumbnail(&self, board_game_id: i64) -> Result<CoverThumbnail, StoreError> {
        let row = sqlx::query_as::<_, CoverThumbnailRow>(
            "SELECT id, board_game_id, thumbnail_data, image_mime_type, image_type \
             FROM board_game_images \
             WHERE board_game_id = $1 AND image_type = 'cover' \
             ORDER BY display_order ASC, id ASC LIMIT 1",
        )
        .bind(board_game_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        cover_from_row(row)
    }

    async fn delete_image(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM board_game_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
