//! Instance-scoped in-memory store.
//!
//! [`InMemoryStore`] implements both store traits over a single
//! [`tokio::sync::RwLock`], mirroring the relational constraints of the
//! PostgreSQL schema: image inserts require an existing board game and
//! deleting a board game cascades to its images. It is never a process
//! global; each instance is injected like any other store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BoardGameImageStore, BoardGameStore, StoreError};
use crate::domain::{
    BoardGame, BoardGameImage, CoverThumbnail, ImageMetadata, ImageType, NewBoardGame,
    NewBoardGameImage,
};

#[derive(Debug, Default)]
struct Tables {
    board_games: BTreeMap<i64, BoardGame>,
    images: BTreeMap<i64, BoardGameImage>,
    last_board_game_id: i64,
    last_image_id: i64,
}

/// Board games and images held in memory for the lifetime of the instance.
///
/// # Concurrency
///
/// Reads proceed concurrently; every mutation takes the write lock, so ids
/// are handed out in insertion order like a `BIGSERIAL` column.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored board games.
    pub async fn board_game_count(&self) -> usize {
        self.tables.read().await.board_games.len()
    }

    /// Returns the number of stored images across all board games.
    pub async fn image_count(&self) -> usize {
        self.tables.read().await.images.len()
    }
}

#[async_trait]
impl BoardGameStore for InMemoryStore {
    async fn create(&self, game: NewBoardGame) -> Result<BoardGame, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_board_game_id = tables.last_board_game_id.saturating_add(1);
        let now = Utc::now();
        let record = BoardGame {
            id: tables.last_board_game_id,
            name: game.name,
            min_players: game.min_players,
            max_players: game.max_players,
            play_time: game.play_time,
            min_age: game.min_age,
            description: game.description,
            image_ids: Vec::new(),
            cover_image_url: None,
            created_at: now,
            updated_at: now,
        };
        tables.board_games.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_all(&self) -> Result<Vec<BoardGame>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.board_games.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<BoardGame, StoreError> {
        let tables = self.tables.read().await;
        tables.board_games.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .board_games
            .remove(&id)
            .ok_or(StoreError::NotFound)?;
        tables.images.retain(|_, image| image.board_game_id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl BoardGameImageStore for InMemoryStore {
    async fn save_image(&self, image: NewBoardGameImage) -> Result<BoardGameImage, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.board_games.contains_key(&image.board_game_id) {
            return Err(StoreError::NotFound);
        }
        tables.last_image_id = tables.last_image_id.saturating_add(1);
        let record = BoardGameImage {
            id: tables.last_image_id,
            board_game_id: image.board_game_id,
            image_data: image.image_data,
            image_mime_type: image.image_mime_type,
            thumbnail_data: image.thumbnail_data,
            image_type: image.image_type,
            display_order: image.display_order,
            uploaded_at: Utc::now(),
        };
        tables.images.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_all_images_for_board_game(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<BoardGameImage>, StoreError> {
        let tables = self.tables.read().await;
        let mut images: Vec<BoardGameImage> = tables
            .images
            .values()
            .filter(|image| image.board_game_id == board_game_id)
            .filter(|image| image_type.is_none_or(|wanted| image.image_type == wanted))
            .cloned()
            .collect();
        images.sort_by_key(|image| (image.display_order, image.id));
        Ok(images)
    }

    async fn list_image_metadata(
        &self,
        board_game_id: i64,
        image_type: Option<ImageType>,
    ) -> Result<Vec<ImageMetadata>, StoreError> {
        let images = self
            .get_all_images_for_board_game(board_game_id, image_type)
            .await?;
        Ok(images.iter().map(ImageMetadata::from).collect())
    }

    async fn get_cover_thumbnail(&self, board_game_id: i64) -> Result<CoverThumbnail, StoreError> {
        let tables = self.tables.read().await;
        tables
            .images
            .values()
            .filter(|image| {
                image.board_game_id == board_game_id && image.image_type == ImageType::Cover
            })
            .min_by_key(|image| (image.display_order, image.id))
            .map(CoverThumbnail::from)
            .ok_or(StoreError::NotFound)
    }

    async fn delete_image(&self, id: i64) -> Result<(), StoreError> {
        self.tables.write().await.images.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn catan() -> NewBoardGame {
        NewBoardGame {
            name: "Catan".to_string(),
            min_players: 3,
            max_players: 4,
            play_time: 90,
            min_age: 10,
            description: "trade and build".to_string(),
        }
    }

    fn image_for(
        board_game_id: i64,
        image_type: ImageType,
        display_order: i32,
    ) -> NewBoardGameImage {
        NewBoardGameImage {
            board_game_id,
            image_data: vec![1, 2, 3],
            image_mime_type: "image/png".to_string(),
            thumbnail_data: vec![0xAB, 0xCD],
            image_type,
            display_order,
        }
    }

    async fn store_with_game() -> (InMemoryStore, i64) {
        let store = InMemoryStore::new();
        let Ok(game) = store.create(catan()).await else {
            panic!("create failed");
        };
        (store, game.id)
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_timestamps() {
        let store = InMemoryStore::new();
        let Ok(first) = store.create(catan()).await else {
            panic!("create failed");
        };
        let Ok(second) = store.create(catan()).await else {
            panic!("create failed");
        };
        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn get_all_on_empty_store_is_empty() {
        let store = InMemoryStore::new();
        let Ok(games) = store.get_all().await else {
            panic!("get_all failed");
        };
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_id() {
        let store = InMemoryStore::new();
        for _ in 0..3 {
            let _ = store.create(catan()).await;
        }
        let Ok(games) = store.get_all().await else {
            panic!("get_all failed");
        };
        let ids: Vec<i64> = games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_by_id(42).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_game_and_cascades_images() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Cover, 0)).await;
        assert_eq!(store.image_count().await, 1);

        assert_eq!(store.delete(id).await, Ok(()));
        assert_eq!(store.get_by_id(id).await, Err(StoreError::NotFound));
        assert_eq!(store.image_count().await, 0);
        assert_eq!(store.board_game_count().await, 0);
    }

    #[tokio::test]
    async fn delete_nonexistent_returns_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(store.delete(7).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn save_image_requires_existing_board_game() {
        let store = InMemoryStore::new();
        let result = store.save_image(image_for(99, ImageType::Cover, 0)).await;
        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn images_are_ordered_and_filtered() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Gameplay, 2)).await;
        let _ = store.save_image(image_for(id, ImageType::Cover, 1)).await;
        let _ = store.save_image(image_for(id, ImageType::Gameplay, 0)).await;

        let Ok(all) = store.get_all_images_for_board_game(id, None).await else {
            panic!("listing failed");
        };
        let orders: Vec<i32> = all.iter().map(|i| i.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let Ok(gameplay) = store
            .get_all_images_for_board_game(id, Some(ImageType::Gameplay))
            .await
        else {
            panic!("listing failed");
        };
        assert_eq!(gameplay.len(), 2);
        assert!(gameplay.iter().all(|i| i.image_type == ImageType::Gameplay));
    }

    #[tokio::test]
    async fn metadata_matches_images_without_bytes() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Gameplay, 2)).await;
        let _ = store.save_image(image_for(id, ImageType::Cover, 1)).await;

        let Ok(all) = store.list_image_metadata(id, None).await else {
            panic!("metadata listing failed");
        };
        let orders: Vec<i32> = all.iter().map(|m| m.display_order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert!(all.iter().all(|m| m.size_bytes == 3 && m.thumbnail_size_bytes == 2));

        let Ok(covers) = store.list_image_metadata(id, Some(ImageType::Cover)).await else {
            panic!("metadata listing failed");
        };
        assert_eq!(covers.len(), 1);
        assert!(covers.iter().all(|m| m.image_type == ImageType::Cover));
    }

    #[tokio::test]
    async fn cover_thumbnail_picks_lowest_display_order() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Cover, 5)).await;
        let Ok(winner) = store.save_image(image_for(id, ImageType::Cover, 1)).await else {
            panic!("save failed");
        };
        let _ = store.save_image(image_for(id, ImageType::Gameplay, 0)).await;

        let Ok(cover) = store.get_cover_thumbnail(id).await else {
            panic!("cover missing");
        };
        assert_eq!(cover.id, winner.id);
        assert_eq!(cover.image_type, ImageType::Cover);
    }

    #[tokio::test]
    async fn cover_thumbnail_is_stable_across_reads() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Cover, 0)).await;

        let first = store.get_cover_thumbnail(id).await;
        let second = store.get_cover_thumbnail(id).await;
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn cover_thumbnail_missing_returns_not_found() {
        let (store, id) = store_with_game().await;
        let _ = store.save_image(image_for(id, ImageType::Gameplay, 0)).await;
        assert_eq!(store.get_cover_thumbnail(id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_image_is_idempotent() {
        let (store, id) = store_with_game().await;
        let Ok(image) = store.save_image(image_for(id, ImageType::Cover, 0)).await else {
            panic!("save failed");
        };
        assert_eq!(store.delete_image(image.id).await, Ok(()));
        assert_eq!(store.delete_image(image.id).await, Ok(()));
        assert_eq!(store.image_count().await, 0);
    }
}
