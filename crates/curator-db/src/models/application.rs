//! Reviewer application database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reviewer_applications table
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationModel {
    pub id: i64,
    pub user_id: i64,
    pub motivation: String,
    pub experience: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<i64>,
    pub admin_notes: Option<String>,
}
