//! Board game request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::NewBoardGame;
use crate::error::ShelfError;

/// Request body for `POST /api/boardgame`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by [`CreateBoardGameRequest::validate`] with a precise
/// message instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBoardGameRequest {
    /// Display name (required, non-blank).
    pub name: Option<String>,
    /// Minimum number of players (required, positive).
    pub min_players: Option<i32>,
    /// Maximum number of players. `0` or absent means no ceiling.
    pub max_players: Option<i32>,
    /// Play time in minutes (required, positive).
    pub play_time: Option<i32>,
    /// Minimum age (required, positive).
    pub min_age: Option<i32>,
    /// Description (required, non-blank).
    pub description: Option<String>,
}

impl CreateBoardGameRequest {
    /// Checks required fields and converts into a [`NewBoardGame`].
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] naming the first missing or
    /// invalid field.
    pub fn validate(self) -> Result<NewBoardGame, ShelfError> {
        let name = required_text(self.name, "name")?;
        let min_players = required_positive(self.min_players, "min_players")?;
        let play_time = required_positive(self.play_time, "play_time")?;
        let min_age = required_positive(self.min_age, "min_age")?;
        let description = required_text(self.description, "description")?;

        let max_players = self.max_players.unwrap_or(0);
        if max_players < 0 {
            return Err(ShelfError::Validation(
                "max_players must not be negative".to_string(),
            ));
        }
        if max_players != 0 && max_players < min_players {
            return Err(ShelfError::Validation(
                "max_players must be 0 or at least min_players".to_string(),
            ));
        }

        Ok(NewBoardGame {
            name,
            min_players,
            max_players,
            play_time,
            min_age,
            description,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ShelfError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ShelfError::Validation(format!("{field} is required")))
}

fn required_positive(value: Option<i32>, field: &str) -> Result<i32, ShelfError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        Some(_) => Err(ShelfError::Validation(format!("{field} must be positive"))),
        None => Err(ShelfError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn catan() -> CreateBoardGameRequest {
        CreateBoardGameRequest {
            name: Some("Catan".to_string()),
            min_players: Some(4),
            max_players: Some(10),
            play_time: Some(60),
            min_age: Some(8),
            description: Some("a fun board game".to_string()),
        }
    }

    fn validation_message(req: CreateBoardGameRequest) -> String {
        match req.validate() {
            Err(ShelfError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn complete_request_validates() {
        let Ok(game) = catan().validate() else {
            panic!("request should validate");
        };
        assert_eq!(game.name, "Catan");
        assert_eq!(game.max_players, 10);
    }

    #[test]
    fn missing_name_is_rejected() {
        let req = CreateBoardGameRequest {
            name: None,
            ..catan()
        };
        assert_eq!(validation_message(req), "name is required");
    }

    #[test]
    fn blank_description_is_rejected() {
        let req = CreateBoardGameRequest {
            description: Some("   ".to_string()),
            ..catan()
        };
        assert_eq!(validation_message(req), "description is required");
    }

    #[test]
    fn zero_or_negative_counts_are_rejected() {
        let req = CreateBoardGameRequest {
            min_players: Some(0),
            ..catan()
        };
        assert_eq!(validation_message(req), "min_players must be positive");

        let req = CreateBoardGameRequest {
            play_time: Some(-5),
            ..catan()
        };
        assert_eq!(validation_message(req), "play_time must be positive");

        let req = CreateBoardGameRequest {
            min_age: None,
            ..catan()
        };
        assert_eq!(validation_message(req), "min_age is required");
    }

    #[test]
    fn absent_max_players_means_no_ceiling() {
        let req = CreateBoardGameRequest {
            max_players: None,
            ..catan()
        };
        let Ok(game) = req.validate() else {
            panic!("request should validate");
        };
        assert_eq!(game.max_players, 0);
    }

    #[test]
    fn max_players_below_min_players_is_rejected() {
        let req = CreateBoardGameRequest {
            max_players: Some(2),
            ..catan()
        };
        assert_eq!(
            validation_message(req),
            "max_players must be 0 or at least min_players"
        );
    }

    #[test]
    fn deserializes_from_wire_json() {
        let json = r#"{"name":"Catan","min_players":4,"max_players":10,"play_time":60,"min_age":8,"description":"a fun board game"}"#;
        let Ok(req) = serde_json::from_str::<CreateBoardGameRequest>(json) else {
            panic!("wire JSON should deserialize");
        };
        assert!(req.validate().is_ok());
    }
}
