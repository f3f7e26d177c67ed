//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AuditLogQueryParams, BatchReviewRequest, CreateApplicationRequest,
    CreateCorrectionRequest, CreateFaqSubmissionRequest, CreateGameSubmissionRequest,
    DecideApplicationRequest, FaqQuery, PendingApplicationsQuery, ProposedField,
    ReviewDecisionRequest, ReviewQueueQuery, SetAllActionsRequest,
};

// Re-export commonly used response types
pub use responses::{
    ApplicationResponse, AuditLogEntryResponse, AuditLogPageResponse, BatchDecisionResponse,
    BatchErrorDetail, BatchItemResult, BatchOutcome, CurrentApplicationResponse,
    EligibilityReport, FaqEntryResponse, HealthChecks, HealthResponse, ReadinessResponse,
    ReapplyCheck, ReviewQueueItemResponse, ReviewQueueResponse, ReviewResponse,
    SubmissionResponse, TargetResponse,
};
