//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use curator_core::{
    ApplicationStatus, FieldValue, Role, SubmissionKind, SubmissionPayload, SubmissionStatus,
};
use serde::Serialize;

pub use curator_core::{EligibilityReport, ReapplyCheck};

// ============================================================================
// Submission Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TargetResponse {
    pub game_id: String,
    pub slug: String,
}

/// Reviewer fields of a decided submission
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub decided_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_value: Option<FieldValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub kind: SubmissionKind,
    pub status: SubmissionStatus,
    pub target: Option<TargetResponse>,
    pub submitter_id: String,
    pub submitter_name: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResponse>,
}

/// One entry of the grouped review queue
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewQueueItemResponse {
    Single {
        submission: SubmissionResponse,
    },
    Batch {
        batch_id: String,
        submitter_id: String,
        target: TargetResponse,
        submissions: Vec<SubmissionResponse>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewQueueResponse {
    pub items: Vec<ReviewQueueItemResponse>,
    /// Items before paging
    pub total_items: usize,
    /// Pending submissions across all items, before paging
    pub total_submissions: usize,
}

// ============================================================================
// Decision Responses
// ============================================================================

/// Outcome of one decision inside a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Committed,
    Conflict,
    ValidationError,
    Forbidden,
    NotFound,
    Internal,
}

impl BatchOutcome {
    /// Classify a failed decision by its HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            409 => Self::Conflict,
            400 => Self::ValidationError,
            401 | 403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub submission_id: String,
    pub outcome: BatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchErrorDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchDecisionResponse {
    pub results: Vec<BatchItemResult>,
    pub committed: usize,
    pub failed: usize,
}

impl BatchDecisionResponse {
    pub fn new(results: Vec<BatchItemResult>) -> Self {
        let committed = results
            .iter()
            .filter(|r| r.outcome == BatchOutcome::Committed)
            .count();
        let failed = results.len() - committed;
        Self {
            results,
            committed,
            failed,
        }
    }
}

// ============================================================================
// Audit Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub submission_id: String,
    pub target: Option<TargetResponse>,
    pub field: String,
    pub old_value: Option<FieldValue>,
    pub new_value: Option<FieldValue>,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewer_role: Role,
    pub submitter_id: Option<String>,
    pub submitter_name: Option<String>,
    pub status: SubmissionStatus,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPageResponse {
    pub entries: Vec<AuditLogEntryResponse>,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Reviewer Application Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub user_id: String,
    pub motivation: String,
    pub experience: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<String>,
    pub admin_notes: Option<String>,
}

/// The caller's latest application, if any
#[derive(Debug, Clone, Serialize)]
pub struct CurrentApplicationResponse {
    pub application: Option<ApplicationResponse>,
}

// ============================================================================
// FAQ Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FaqEntryResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub source_submission_id: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// `disabled` when notifications are only logged
    pub redis: String,
}

fn check_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

impl ReadinessResponse {
    /// `redis_healthy` is `None` when no Redis is configured
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: check_label(database_healthy).to_string(),
                redis: redis_healthy.map_or("disabled", check_label).to_string(),
            },
        }
    }
}
