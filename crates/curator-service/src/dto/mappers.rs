//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use curator_core::{
    AuditLogEntry, FaqEntry, ReviewItem, ReviewRecord, ReviewerApplication, Submission, TargetRef,
};

use super::responses::{
    ApplicationResponse, AuditLogEntryResponse, FaqEntryResponse, ReviewQueueItemResponse,
    ReviewResponse, SubmissionResponse, TargetResponse,
};

// ============================================================================
// Submission Mappers
// ============================================================================

impl From<&TargetRef> for TargetResponse {
    fn from(target: &TargetRef) -> Self {
        Self {
            game_id: target.game_id.to_string(),
            slug: target.slug.clone(),
        }
    }
}

impl From<&ReviewRecord> for ReviewResponse {
    fn from(review: &ReviewRecord) -> Self {
        Self {
            reviewer_id: review.reviewer_id.to_string(),
            reviewer_name: review.reviewer_name.clone(),
            decided_at: review.decided_at,
            review_notes: review.notes.clone(),
            final_value: review.final_value.clone(),
        }
    }
}

impl From<&Submission> for SubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id.to_string(),
            kind: submission.kind(),
            status: submission.status,
            target: submission.target.as_ref().map(TargetResponse::from),
            submitter_id: submission.submitter_id.to_string(),
            submitter_name: submission.submitter_name.clone(),
            submitted_at: submission.submitted_at,
            payload: submission.payload.clone(),
            justification: submission.justification.clone(),
            review: submission.review.as_ref().map(ReviewResponse::from),
        }
    }
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self::from(&submission)
    }
}

impl From<&ReviewItem> for ReviewQueueItemResponse {
    fn from(item: &ReviewItem) -> Self {
        match item {
            ReviewItem::Single(submission) => Self::Single {
                submission: submission.into(),
            },
            ReviewItem::Batch {
                batch_id,
                submitter_id,
                target,
                submissions,
            } => Self::Batch {
                batch_id: batch_id.clone(),
                submitter_id: submitter_id.to_string(),
                target: target.into(),
                submissions: submissions.iter().map(SubmissionResponse::from).collect(),
            },
        }
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<&AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: &AuditLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            submission_id: entry.submission_id.to_string(),
            target: entry.target.as_ref().map(TargetResponse::from),
            field: entry.field.clone(),
            old_value: entry.old_value.clone(),
            new_value: entry.new_value.clone(),
            reviewer_id: entry.reviewer_id.to_string(),
            reviewer_name: entry.reviewer_name.clone(),
            reviewer_role: entry.reviewer_role,
            submitter_id: entry.submitter_id.map(|id| id.to_string()),
            submitter_name: entry.submitter_name.clone(),
            status: entry.status,
            review_notes: entry.notes.clone(),
            created_at: entry.created_at,
        }
    }
}

// ============================================================================
// Application / FAQ Mappers
// ============================================================================

impl From<&ReviewerApplication> for ApplicationResponse {
    fn from(application: &ReviewerApplication) -> Self {
        Self {
            id: application.id.to_string(),
            user_id: application.user_id.to_string(),
            motivation: application.motivation.clone(),
            experience: application.experience.clone(),
            status: application.status,
            created_at: application.created_at,
            decided_at: application.decided_at,
            decided_by: application.decided_by.map(|id| id.to_string()),
            admin_notes: application.admin_notes.clone(),
        }
    }
}

impl From<ReviewerApplication> for ApplicationResponse {
    fn from(application: ReviewerApplication) -> Self {
        Self::from(&application)
    }
}

impl From<&FaqEntry> for FaqEntryResponse {
    fn from(entry: &FaqEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            category: entry.category.clone(),
            source_submission_id: entry.source_submission_id.to_string(),
            created_at: entry.created_at,
        }
    }
}
