//! Game entity <-> model mapper

use std::collections::BTreeMap;

use curator_core::entities::Game;
use curator_core::{DomainError, FieldValue, Snowflake};
use serde_json::Value as JsonValue;

use super::{from_json, to_json};
use crate::models::GameModel;

impl TryFrom<GameModel> for Game {
    type Error = DomainError;

    fn try_from(model: GameModel) -> Result<Self, Self::Error> {
        Ok(Game {
            id: Snowflake::new(model.id),
            slug: model.slug,
            title: model.title,
            fields: from_json(model.fields, "games.fields")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Encode the field map for the `fields` JSONB column
pub fn fields_to_json(fields: &BTreeMap<String, FieldValue>) -> Result<JsonValue, DomainError> {
    to_json(fields)
}
