//! Published FAQ entry

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// FAQ item published from an approved or modified FAQ submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub id: Snowflake,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub source_submission_id: Snowflake,
    pub created_at: DateTime<Utc>,
}
