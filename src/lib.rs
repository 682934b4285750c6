//! # game-shelf
//!
//! REST backend for a personal board game catalog.
//!
//! Board games are created, listed, fetched and deleted over JSON. Each
//! game may carry images (a cover and gameplay shots); on upload a 300 px
//! wide thumbnail is generated and stored next to the original so the
//! cover endpoint can serve it without re-encoding.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │       └── Thumbnail generation (thumbnail)
//!     │
//!     ├── BoardGameStore / BoardGameImageStore (persistence/)
//!     │
//!     └── PostgreSQL (board_games, board_game_images)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod thumbnail;
