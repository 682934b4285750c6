//! OpenAPI document collected from the handler annotations.

use utoipa::OpenApi;

use super::dto::{
    CreateBoardGameRequest, ImageSummaryDto, UploadImageForm, UploadImageResponse,
};
use super::handlers::{board_game, image, system};
use crate::domain::{BoardGame, ImageType};
use crate::error::ErrorResponse;

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "game-shelf",
        description = "Board game catalog with image upload and cover thumbnails."
    ),
    paths(
        board_game::create_board_game,
        board_game::list_board_games,
        board_game::get_board_game,
        board_game::delete_board_game,
        image::upload_image,
        image::list_images,
        image::get_cover_image,
        image::delete_image,
        system::health_handler,
    ),
    components(schemas(
        BoardGame,
        CreateBoardGameRequest,
        ImageType,
        ImageSummaryDto,
        UploadImageForm,
        UploadImageResponse,
        ErrorResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "Board games", description = "Catalog CRUD"),
        (name = "Images", description = "Image upload and thumbnails"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
