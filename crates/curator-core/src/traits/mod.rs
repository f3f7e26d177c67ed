//! Repository and dispatcher traits (ports)

mod notifier;
mod repositories;

pub use notifier::NotificationDispatcher;
pub use repositories::{
    ApplicationRepository, AuditLogQuery, AuditLogRepository, AuditSort, FaqRepository,
    GameRepository, PendingFilter, RepoResult, SubmissionRepository, UserRepository,
};
