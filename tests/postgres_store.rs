//! PostgreSQL store tests. Run against a disposable database with
//! `DATABASE_URL=... cargo test -- --ignored`.

#![allow(clippy::panic)]

use game_shelf::domain::{ImageType, NewBoardGame, NewBoardGameImage};
use game_shelf::persistence::{
    BoardGameImageStore, BoardGameStore, PostgresBoardGameStore, PostgresImageStore, StoreError,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;

async fn connect() -> PgPool {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        panic!("DATABASE_URL must be set");
    };
    let Ok(pool) = PgPool::connect(&url).await else {
        panic!("failed to connect to {url}");
    };
    let Ok(migrator) = Migrator::new(std::path::PathBuf::from("./migrations")).await else {
        panic!("failed to load migrations");
    };
    if let Err(e) = migrator.run(&pool).await {
        panic!("failed to apply migrations: {e}");
    }
    pool
}

fn new_game(name: &str) -> NewBoardGame {
    NewBoardGame {
        name: name.to_string(),
        min_players: 2,
        max_players: 4,
        play_time: 30,
        min_age: 10,
        description: "integration fixture".to_string(),
    }
}

fn new_image(board_game_id: i64, image_type: ImageType, display_order: i32) -> NewBoardGameImage {
    NewBoardGameImage {
        board_game_id,
        image_data: vec![1, 2, 3, 4],
        image_mime_type: "image/png".to_string(),
        thumbnail_data: vec![display_order.to_le_bytes().iter().sum()],
        image_type,
        display_order,
    }
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn board_game_crud() {
    let pool = connect().await;
    let store = PostgresBoardGameStore::new(pool);

    let Ok(created) = store.create(new_game("Carcassonne")).await else {
        panic!("create failed");
    };
    assert!(created.id > 0);

    let Ok(fetched) = store.get_by_id(created.id).await else {
        panic!("get failed");
    };
    assert_eq!(fetched.name, "Carcassonne");
    assert_eq!(fetched.created_at, created.created_at);

    let Ok(all) = store.get_all().await else {
        panic!("list failed");
    };
    assert!(all.iter().any(|g| g.id == created.id));

    assert_eq!(store.delete(created.id).await, Ok(()));
    assert_eq!(store.get_by_id(created.id).await, Err(StoreError::NotFound));
    assert_eq!(store.delete(created.id).await, Err(StoreError::NotFound));
    assert_eq!(store.ping().await, Ok(()));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn images_cascade_and_pick_lowest_cover() {
    let pool = connect().await;
    let games = PostgresBoardGameStore::new(pool.clone());
    let images = PostgresImageStore::new(pool);

    let Ok(game) = games.create(new_game("Wingspan")).await else {
        panic!("create failed");
    };

    for (image_type, order) in [
        (ImageType::Cover, 3),
        (ImageType::Cover, 1),
        (ImageType::Gameplay, 0),
    ] {
        if let Err(e) = images.save_image(new_image(game.id, image_type, order)).await {
            panic!("save failed: {e}");
        }
    }

    let Ok(cover) = images.get_cover_thumbnail(game.id).await else {
        panic!("cover lookup failed");
    };
    assert_eq!(cover.image_type, ImageType::Cover);
    assert_eq!(cover.thumbnail_data, vec![1]);

    let Ok(gameplay) = images
        .get_all_images_for_board_game(game.id, Some(ImageType::Gameplay))
        .await
    else {
        panic!("listing failed");
    };
    assert_eq!(gameplay.len(), 1);

    let Ok(metadata) = images.list_image_metadata(game.id, None).await else {
        panic!("metadata listing failed");
    };
    let orders: Vec<i32> = metadata.iter().map(|m| m.display_order).collect();
    assert_eq!(orders, vec![0, 1, 3]);
    assert!(metadata.iter().all(|m| m.size_bytes == 4 && m.thumbnail_size_bytes == 1));

    let Ok(covers) = images
        .list_image_metadata(game.id, Some(ImageType::Cover))
        .await
    else {
        panic!("metadata listing failed");
    };
    assert_eq!(covers.len(), 2);

    assert_eq!(
        images
            .save_image(new_image(i64::MAX, ImageType::Cover, 0))
            .await
            .map(|_| ()),
        Err(StoreError::NotFound)
    );

    assert_eq!(games.delete(game.id).await, Ok(()));
    let Ok(remaining) = images.get_all_images_for_board_game(game.id, None).await else {
        panic!("listing failed");
    };
    assert!(remaining.is_empty());
}
