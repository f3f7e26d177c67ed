//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Submission not found: {0}")]
    SubmissionNotFound(Snowflake),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Reviewer application not found: {0}")]
    ApplicationNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Review notes are required when rejecting")]
    MissingReviewNotes,

    #[error("A final value is required when modifying")]
    MissingFinalValue,

    #[error("Invalid target reference: {0}")]
    InvalidTarget(String),

    #[error("{field} is too long: max {max} characters")]
    ContentTooLong { field: &'static str, max: usize },

    #[error("{field} is too short: min {min} characters")]
    ContentTooShort { field: &'static str, min: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Reviewers cannot decide their own submissions")]
    SelfReview,

    #[error("Insufficient role: {0} required")]
    InsufficientRole(&'static str),

    #[error("Reviewer application cooldown active: {days_remaining} days remaining")]
    ReapplyCooldown { days_remaining: i64 },

    #[error("User is already a reviewer or admin")]
    AlreadyReviewer,

    #[error("User does not meet reviewer requirements: {}", .0.join("; "))]
    NotEligible(Vec<String>),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Submission has already been processed")]
    AlreadyProcessed,

    #[error("A pending reviewer application already exists")]
    PendingApplicationExists,

    #[error("Reviewer application has already been decided")]
    ApplicationAlreadyDecided,

    #[error("Game slug already in use: {0}")]
    GameSlugExists(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::SubmissionNotFound(_) => "UNKNOWN_SUBMISSION",
            Self::GameNotFound(_) => "UNKNOWN_GAME",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ApplicationNotFound(_) => "UNKNOWN_APPLICATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingReviewNotes => "MISSING_REVIEW_NOTES",
            Self::MissingFinalValue => "MISSING_FINAL_VALUE",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::ContentTooShort { .. } => "CONTENT_TOO_SHORT",

            // Authorization
            Self::SelfReview => "SELF_REVIEW_FORBIDDEN",
            Self::InsufficientRole(_) => "INSUFFICIENT_ROLE",
            Self::ReapplyCooldown { .. } => "REAPPLY_COOLDOWN",
            Self::AlreadyReviewer => "ALREADY_REVIEWER",
            Self::NotEligible(_) => "NOT_ELIGIBLE",

            // Conflict
            Self::AlreadyProcessed => "ALREADY_PROCESSED",
            Self::PendingApplicationExists => "PENDING_APPLICATION_EXISTS",
            Self::ApplicationAlreadyDecided => "APPLICATION_ALREADY_DECIDED",
            Self::GameSlugExists(_) => "GAME_SLUG_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::NotificationError(_) => "NOTIFICATION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SubmissionNotFound(_)
                | Self::GameNotFound(_)
                | Self::UserNotFound(_)
                | Self::ApplicationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::MissingReviewNotes
                | Self::MissingFinalValue
                | Self::InvalidTarget(_)
                | Self::ContentTooLong { .. }
                | Self::ContentTooShort { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::SelfReview
                | Self::InsufficientRole(_)
                | Self::ReapplyCooldown { .. }
                | Self::AlreadyReviewer
                | Self::NotEligible(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyProcessed
                | Self::PendingApplicationExists
                | Self::ApplicationAlreadyDecided
                | Self::GameSlugExists(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::SubmissionNotFound(Snowflake::new(1)).code(),
            "UNKNOWN_SUBMISSION"
        );
        assert_eq!(DomainError::AlreadyProcessed.code(), "ALREADY_PROCESSED");
        assert_eq!(DomainError::SelfReview.code(), "SELF_REVIEW_FORBIDDEN");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::SubmissionNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::MissingReviewNotes.is_validation());
        assert!(DomainError::MissingFinalValue.is_validation());
        assert!(DomainError::ReapplyCooldown { days_remaining: 3 }.is_authorization());
        assert!(DomainError::AlreadyProcessed.is_conflict());
        assert!(!DomainError::AlreadyProcessed.is_validation());
        assert!(!DomainError::DatabaseError("down".into()).is_conflict());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::AlreadyProcessed.to_string(),
            "Submission has already been processed"
        );
        assert_eq!(
            DomainError::ContentTooLong { field: "review_notes", max: 2000 }.to_string(),
            "review_notes is too long: max 2000 characters"
        );
        assert_eq!(
            DomainError::NotEligible(vec!["a".into(), "b".into()]).to_string(),
            "User does not meet reviewer requirements: a; b"
        );
    }
}
