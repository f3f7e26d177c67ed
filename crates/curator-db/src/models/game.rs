//! Game database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for games table
#[derive(Debug, Clone, FromRow)]
pub struct GameModel {
    pub id: i64,
    pub slug: String,
    pub title: String,
    /// JSON object of field name to tagged value
    pub fields: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
