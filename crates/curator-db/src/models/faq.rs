//! FAQ entry database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for faq_entries table
#[derive(Debug, Clone, FromRow)]
pub struct FaqEntryModel {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub source_submission_id: i64,
    pub created_at: DateTime<Utc>,
}
