//! Domain entities - core business objects

mod application;
mod audit_log;
mod decision;
mod faq;
mod game;
mod submission;
mod user;

pub use application::{
    ApplicationDecision, ApplicationStatus, ReviewerApplication, MAX_APPLICATION_TEXT_LEN,
    MIN_APPLICATION_TEXT_LEN,
};
pub use audit_log::AuditLogEntry;
pub use decision::{CommitEffect, Decision, DecisionCommit, ReviewAction};
pub use faq::FaqEntry;
pub use game::{slugify, Game, TITLE_FIELD};
pub use submission::{
    FaqProposal, FieldChange, GameProposal, ReviewRecord, Submission, SubmissionKind,
    SubmissionPayload, SubmissionStatus, TargetRef, MAX_FAQ_ANSWER_LEN, MAX_FAQ_QUESTION_LEN,
    MAX_FIELD_NAME_LEN, MAX_JUSTIFICATION_LEN, MAX_REVIEW_NOTES_LEN, MAX_VALUE_LEN,
};
pub use user::{Actor, Role, UserAggregate};
