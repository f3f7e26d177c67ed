//! # curator-core
//!
//! Domain layer for the moderation workflow: submissions and their review
//! state machine, audit entries, reviewer applications, repository traits,
//! and the pure batch grouping and eligibility rules.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod policies;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Actor, ApplicationDecision, ApplicationStatus, AuditLogEntry, CommitEffect, Decision,
    DecisionCommit, FaqEntry, FaqProposal, FieldChange, Game, GameProposal, ReviewAction,
    ReviewRecord, ReviewerApplication, Role, Submission, SubmissionKind, SubmissionPayload,
    SubmissionStatus, TargetRef, UserAggregate,
};
pub use error::DomainError;
pub use events::ModerationEvent;
pub use policies::{
    approval_rate, can_reapply, evaluate_eligibility, group_submissions,
    group_submissions_within, ApplicationStanding, EligibilityReport, EligibilityThresholds,
    ReapplyCheck, ReviewItem, MERGE_WINDOW_MINUTES,
};
pub use traits::{
    ApplicationRepository, AuditLogQuery, AuditLogRepository, AuditSort, FaqRepository,
    GameRepository, NotificationDispatcher, PendingFilter, RepoResult, SubmissionRepository,
    UserRepository,
};
pub use value_objects::{
    FieldValue, Snowflake, SnowflakeGenerator, SnowflakeParseError, MAX_WORKER_ID,
};
