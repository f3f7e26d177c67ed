//! Submission database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for submissions table
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionModel {
    pub id: i64,
    pub kind: String,
    pub target_game_id: Option<i64>,
    pub target_slug: Option<String>,
    pub submitter_id: i64,
    pub submitter_name: String,
    pub submitted_at: DateTime<Utc>,
    /// Tagged payload, see `SubmissionPayload`
    pub payload: JsonValue,
    pub justification: Option<String>,
    pub status: String,
    pub reviewer_id: Option<i64>,
    pub reviewer_name: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub final_value: Option<JsonValue>,
}

impl SubmissionModel {
    /// Column list shared by every submission query
    pub const COLUMNS: &'static str = "id, kind, target_game_id, target_slug, submitter_id, \
        submitter_name, submitted_at, payload, justification, status, reviewer_id, \
        reviewer_name, decided_at, review_notes, final_value";

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}
