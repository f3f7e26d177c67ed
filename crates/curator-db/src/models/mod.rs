//! Database models - SQLx-compatible structs for PostgreSQL tables

mod application;
mod audit_log;
mod faq;
mod game;
mod submission;
mod user;

pub use application::ApplicationModel;
pub use audit_log::AuditLogModel;
pub use faq::FaqEntryModel;
pub use game::GameModel;
pub use submission::SubmissionModel;
pub use user::UserModel;
