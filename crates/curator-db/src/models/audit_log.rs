//! Audit log database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for audit_log table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub submission_id: i64,
    pub target_game_id: Option<i64>,
    pub target_slug: Option<String>,
    pub field: String,
    pub old_value: Option<JsonValue>,
    pub new_value: Option<JsonValue>,
    pub reviewer_id: i64,
    pub reviewer_name: String,
    pub reviewer_role: String,
    pub submitter_id: Option<i64>,
    pub submitter_name: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogModel {
    pub const COLUMNS: &'static str = "id, submission_id, target_game_id, target_slug, field, \
        old_value, new_value, reviewer_id, reviewer_name, reviewer_role, submitter_id, \
        submitter_name, status, notes, created_at";
}
