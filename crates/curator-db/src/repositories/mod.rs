//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in curator-core.

mod application;
mod audit_log;
mod error;
mod faq;
mod game;
mod submission;
mod user;

pub use application::PgApplicationRepository;
pub use audit_log::PgAuditLogRepository;
pub use faq::PgFaqRepository;
pub use game::PgGameRepository;
pub use submission::PgSubmissionRepository;
pub use user::PgUserRepository;
