//! Request DTOs for API endpoints
//!
//! Body DTOs implement `Deserialize` and `Validate` for input validation.
//! Identifiers accept either a JSON string or an integer.

use curator_core::{
    ApplicationStatus, AuditLogQuery, AuditSort, FieldValue, PendingFilter, ReviewAction, Role,
    Snowflake, SubmissionKind,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// ============================================================================
// Submission Requests
// ============================================================================

/// Propose a change to one field of an existing game
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_correction_target"))]
pub struct CreateCorrectionRequest {
    pub game_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 200, message = "Game slug must be 1-200 characters"))]
    pub game_slug: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Field name must be 1-64 characters"))]
    pub field: String,

    pub new_value: FieldValue,

    #[validate(length(max = 2000, message = "Justification must be at most 2000 characters"))]
    pub justification: Option<String>,
}

fn validate_correction_target(request: &CreateCorrectionRequest) -> Result<(), ValidationError> {
    if request.game_id.is_none() && request.game_slug.is_none() {
        let mut err = ValidationError::new("missing_target");
        err.message = Some("Either game_id or game_slug is required".into());
        return Err(err);
    }
    Ok(())
}

/// One proposed field value inside a game submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProposedField {
    #[validate(length(min = 1, max = 64, message = "Field name must be 1-64 characters"))]
    pub field: String,

    pub value: FieldValue,
}

/// Propose a new game, or a set of edits to an existing one when a target is given
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGameSubmissionRequest {
    pub game_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 200, message = "Game slug must be 1-200 characters"))]
    pub game_slug: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Title must be 1-5000 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 fields per submission"), nested)]
    pub fields: Vec<ProposedField>,

    #[validate(length(max = 2000, message = "Justification must be at most 2000 characters"))]
    pub justification: Option<String>,
}

/// Propose a new FAQ entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFaqSubmissionRequest {
    #[validate(length(min = 1, max = 500, message = "Question must be 1-500 characters"))]
    pub question: String,

    #[validate(length(min = 1, max = 5000, message = "Answer must be 1-5000 characters"))]
    pub answer: String,

    #[validate(length(min = 1, max = 64, message = "Category must be 1-64 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 2000, message = "Justification must be at most 2000 characters"))]
    pub justification: Option<String>,
}

// ============================================================================
// Review Requests
// ============================================================================

/// Decide one submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewDecisionRequest {
    pub submission_id: Snowflake,

    /// `approved`, `rejected` or `modified`
    pub status: ReviewAction,

    #[validate(length(max = 2000, message = "Review notes must be at most 2000 characters"))]
    pub review_notes: Option<String>,

    /// Required for `modified`; replaces the proposed value
    pub final_value: Option<FieldValue>,

    /// Lets an admin decide their own submission
    #[serde(default)]
    pub override_self_review: bool,
}

/// Decide several submissions; each one commits independently.
///
/// Only the batch size is checked up front. Items are validated one by one
/// so a bad item fails alone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchReviewRequest {
    #[validate(length(min = 1, max = 100, message = "A batch holds 1-100 decisions"))]
    pub reviews: Vec<ReviewDecisionRequest>,
}

/// "Approve all" / "reject all" over a list of submissions
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetAllActionsRequest {
    #[validate(length(min = 1, max = 100, message = "Select 1-100 submissions"))]
    pub submission_ids: Vec<Snowflake>,

    pub status: ReviewAction,

    #[validate(length(max = 2000, message = "Review notes must be at most 2000 characters"))]
    pub review_notes: Option<String>,
}

/// Filter for the review queue
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQueueQuery {
    pub kind: Option<SubmissionKind>,
    pub submitter_id: Option<Snowflake>,
    pub game_id: Option<Snowflake>,
    /// Page size in review items, not submissions
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ReviewQueueQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    /// `(offset, limit)` over the grouped items
    pub fn page(&self) -> (usize, usize) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (
            usize::try_from(offset).unwrap_or(usize::MAX),
            usize::try_from(limit).unwrap_or(usize::MAX),
        )
    }
}

/// Paging applies after grouping, so the store lists every match
impl From<&ReviewQueueQuery> for PendingFilter {
    fn from(query: &ReviewQueueQuery) -> Self {
        Self {
            kind: query.kind,
            submitter_id: query.submitter_id,
            target_id: query.game_id,
            limit: None,
        }
    }
}

// ============================================================================
// Audit Requests
// ============================================================================

/// Audit log query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQueryParams {
    pub reviewer_role: Option<Role>,
    pub field: Option<String>,
    pub submitter_id: Option<Snowflake>,
    pub reviewer_id: Option<Snowflake>,
    /// Free-text search
    pub q: Option<String>,
    /// `asc` or `desc` (default)
    pub sort: Option<AuditSort>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<AuditLogQueryParams> for AuditLogQuery {
    fn from(params: AuditLogQueryParams) -> Self {
        Self {
            reviewer_role: params.reviewer_role,
            field: params.field.filter(|f| !f.trim().is_empty()),
            submitter_id: params.submitter_id,
            reviewer_id: params.reviewer_id,
            search: params.q,
            sort: params.sort.unwrap_or_default(),
            limit: params
                .limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: params.offset.unwrap_or(0).max(0),
        }
    }
}

// ============================================================================
// Reviewer Application Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 10, max = 2000, message = "Motivation must be 10-2000 characters"))]
    pub motivation: String,

    #[validate(length(min = 10, max = 2000, message = "Experience must be 10-2000 characters"))]
    pub experience: String,
}

/// Admin verdict on an application
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecideApplicationRequest {
    /// `approved` or `rejected`
    pub status: ApplicationStatus,

    #[validate(length(max = 2000, message = "Admin notes must be at most 2000 characters"))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingApplicationsQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// FAQ Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqQuery {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_correction_requires_a_target() {
        let request: CreateCorrectionRequest = serde_json::from_value(json!({
            "field": "developer",
            "new_value": { "type": "text", "value": "Acme" }
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateCorrectionRequest = serde_json::from_value(json!({
            "game_slug": "foo",
            "field": "developer",
            "new_value": { "type": "text", "value": "Acme" }
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_batch_checks_size_not_items() {
        let long_notes = "x".repeat(2001);
        let request: BatchReviewRequest = serde_json::from_value(json!({
            "reviews": [
                { "submission_id": "1", "status": "approved", "review_notes": long_notes },
                { "submission_id": "2", "status": "approved" }
            ]
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let empty: BatchReviewRequest = serde_json::from_value(json!({ "reviews": [] })).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_decision_accepts_string_or_numeric_id() {
        let a: ReviewDecisionRequest = serde_json::from_value(json!({
            "submission_id": "42",
            "status": "approved"
        }))
        .unwrap();
        let b: ReviewDecisionRequest = serde_json::from_value(json!({
            "submission_id": 42,
            "status": "rejected",
            "review_notes": "duplicate"
        }))
        .unwrap();

        assert_eq!(a.submission_id, b.submission_id);
        assert_eq!(a.status, ReviewAction::Approve);
        assert!(!a.override_self_review);
        assert_eq!(b.status, ReviewAction::Reject);
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        let request = BatchReviewRequest { reviews: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_batch_validates_each_review() {
        let request: BatchReviewRequest = serde_json::from_value(json!({
            "reviews": [
                { "submission_id": "1", "status": "rejected", "review_notes": "x".repeat(2001) }
            ]
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_application_text_bounds() {
        let short = CreateApplicationRequest {
            motivation: "too short".to_string(),
            experience: "ten chars!".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = CreateApplicationRequest {
            motivation: "I fix typos a lot".to_string(),
            experience: "Wiki editor for years".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_audit_params_are_clamped() {
        let query = AuditLogQuery::from(AuditLogQueryParams {
            limit: Some(10_000),
            offset: Some(-5),
            sort: Some(AuditSort::Oldest),
            ..Default::default()
        });
        assert_eq!(query.limit, AuditLogQuery::MAX_LIMIT);
        assert_eq!(query.offset, 0);
        assert_eq!(query.sort, AuditSort::Oldest);

        let defaults = AuditLogQuery::from(AuditLogQueryParams::default());
        assert_eq!(defaults.limit, AuditLogQuery::DEFAULT_LIMIT);
        assert_eq!(defaults.sort, AuditSort::Newest);
    }
}
