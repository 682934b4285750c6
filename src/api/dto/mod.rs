//! Data Transfer Objects for REST request/response serialization.
//!
//! Board game responses serialize the domain [`crate::domain::BoardGame`]
//! directly; only requests and image payloads need dedicated shapes.

pub mod board_game_dto;
pub mod image_dto;

pub use board_game_dto::*;
pub use image_dto::*;
