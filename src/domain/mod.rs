//! Domain layer: board games, their images, and image roles.
//!
//! These are passive records. Validation of client input happens in the
//! API DTOs; persistence happens behind the store traits in
//! [`crate::persistence`].

pub mod board_game;
pub mod board_game_image;
pub mod image_type;

pub use board_game::{BoardGame, NewBoardGame, cover_image_url};
pub use board_game_image::{BoardGameImage, CoverThumbnail, ImageMetadata, NewBoardGameImage};
pub use image_type::{ImageType, ParseImageTypeError};
