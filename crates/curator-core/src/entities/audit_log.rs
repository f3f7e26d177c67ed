//! Audit log entry - immutable record of one committed decision

use chrono::{DateTime, Utc};

use super::submission::{SubmissionStatus, TargetRef};
use super::user::Role;
use crate::value_objects::{FieldValue, Snowflake};

/// Written exactly once per committed decision; never updated or deleted
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub id: Snowflake,
    pub submission_id: Snowflake,
    pub target: Option<TargetRef>,
    pub field: String,
    pub old_value: Option<FieldValue>,
    pub new_value: Option<FieldValue>,
    pub reviewer_id: Snowflake,
    pub reviewer_name: String,
    pub reviewer_role: Role,
    /// Only recorded when the submitter is not the reviewer
    pub submitter_id: Option<Snowflake>,
    pub submitter_name: Option<String>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Case-insensitive match against field, values, notes and names.
    /// `needle_lower` must already be lowercase.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        let contains = |s: &str| s.to_lowercase().contains(needle_lower);

        contains(&self.field)
            || contains(&self.reviewer_name)
            || self.submitter_name.as_deref().is_some_and(contains)
            || self.notes.as_deref().is_some_and(contains)
            || self.target.as_ref().is_some_and(|t| contains(&t.slug))
            || self
                .old_value
                .as_ref()
                .is_some_and(|v| v.contains_ignore_case(needle_lower))
            || self
                .new_value
                .as_ref()
                .is_some_and(|v| v.contains_ignore_case(needle_lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AuditLogEntry {
        AuditLogEntry {
            id: Snowflake::new(1),
            submission_id: Snowflake::new(2),
            target: Some(TargetRef {
                game_id: Snowflake::new(3),
                slug: "super-metroid".to_string(),
            }),
            field: "developer".to_string(),
            old_value: Some(FieldValue::text("Nintendo R&D1")),
            new_value: Some(FieldValue::text("Nintendo")),
            reviewer_id: Snowflake::new(4),
            reviewer_name: "Samus".to_string(),
            reviewer_role: Role::Reviewer,
            submitter_id: Some(Snowflake::new(5)),
            submitter_name: Some("ridley".to_string()),
            status: SubmissionStatus::Approved,
            notes: Some("Per the manual credits".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_text() {
        let e = entry();
        assert!(e.matches_text("r&d1"));
        assert!(e.matches_text("samus"));
        assert!(e.matches_text("ridley"));
        assert!(e.matches_text("manual"));
        assert!(e.matches_text("metroid"));
        assert!(!e.matches_text("zelda"));
    }
}
