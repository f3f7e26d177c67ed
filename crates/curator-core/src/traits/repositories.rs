//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every decision goes through
//! [`SubmissionRepository::set_decision`], the only place a submission
//! leaves `pending`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AuditLogEntry, DecisionCommit, FaqEntry, Game, ReviewerApplication, Role, Submission,
    SubmissionKind, UserAggregate,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Submission Repository
// ============================================================================

/// Filter for the pending queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFilter {
    pub kind: Option<SubmissionKind>,
    pub submitter_id: Option<Snowflake>,
    pub target_id: Option<Snowflake>,
    pub limit: Option<i64>,
}

impl PendingFilter {
    pub const MAX_LIMIT: i64 = 500;

    /// Requested limit clamped to `1..=MAX_LIMIT`; `None` lists every match
    pub fn effective_limit(&self) -> Option<i64> {
        self.limit.map(|limit| limit.clamp(1, Self::MAX_LIMIT))
    }
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Find submission by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Submission>>;

    /// Persist a new pending submission and bump the submitter's
    /// `submissions_count`
    async fn create(&self, submission: &Submission) -> RepoResult<()>;

    /// Pending submissions matching the filter, oldest first
    async fn list_pending(&self, filter: &PendingFilter) -> RepoResult<Vec<Submission>>;

    /// Atomically commit a decision.
    ///
    /// Succeeds only if the stored status is still `pending`; otherwise
    /// returns `AlreadyProcessed` and writes nothing. On success the status and
    /// review fields, the submitter counter, the commit effect and the audit
    /// entry are all written together.
    async fn set_decision(&self, commit: &DecisionCommit) -> RepoResult<Submission>;
}

// ============================================================================
// Game Repository
// ============================================================================

#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Game>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>>;

    /// Create a game; fails with `GameSlugExists` on a duplicate slug
    async fn create(&self, game: &Game) -> RepoResult<()>;
}

// ============================================================================
// FAQ Repository
// ============================================================================

#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// Published entries, optionally restricted to one category
    async fn list(&self, category: Option<&str>) -> RepoResult<Vec<FaqEntry>>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserAggregate>>;

    /// Create a new user with zeroed counters
    async fn create(&self, user: &UserAggregate) -> RepoResult<()>;

    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<()>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditSort {
    #[default]
    #[serde(rename = "desc")]
    Newest,
    #[serde(rename = "asc")]
    Oldest,
}

/// Audit log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    pub reviewer_role: Option<Role>,
    pub field: Option<String>,
    pub submitter_id: Option<Snowflake>,
    pub reviewer_id: Option<Snowflake>,
    /// Case-insensitive text search over field, values, notes and names
    pub search: Option<String>,
    pub sort: AuditSort,
    pub limit: i64,
    pub offset: i64,
}

impl AuditLogQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    /// Lowercased, trimmed search text; `None` when empty
    pub fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether an entry passes every filter except paging
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if self.reviewer_role.is_some_and(|role| entry.reviewer_role != role) {
            return false;
        }
        if self.field.as_deref().is_some_and(|f| entry.field != f) {
            return false;
        }
        if self.submitter_id.is_some() && entry.submitter_id != self.submitter_id {
            return false;
        }
        if self.reviewer_id.is_some_and(|id| entry.reviewer_id != id) {
            return false;
        }
        match self.search_needle() {
            Some(needle) => entry.matches_text(&needle),
            None => true,
        }
    }
}

impl Default for AuditLogQuery {
    fn default() -> Self {
        Self {
            reviewer_role: None,
            field: None,
            submitter_id: None,
            reviewer_id: None,
            search: None,
            sort: AuditSort::default(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Read-only access to the audit log. Entries are written by
/// [`SubmissionRepository::set_decision`] and nowhere else.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn list(&self, query: &AuditLogQuery) -> RepoResult<Vec<AuditLogEntry>>;

    async fn find_by_submission(&self, submission_id: Snowflake)
        -> RepoResult<Option<AuditLogEntry>>;
}

// ============================================================================
// Reviewer Application Repository
// ============================================================================

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a pending application; fails with `PendingApplicationExists`
    /// if the user already has one
    async fn create(&self, application: &ReviewerApplication) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReviewerApplication>>;

    /// All applications of a user, newest first
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ReviewerApplication>>;

    async fn latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<ReviewerApplication>>;

    /// Most recently decided rejected application of a user
    async fn latest_rejected(&self, user_id: Snowflake)
        -> RepoResult<Option<ReviewerApplication>>;

    async fn has_pending(&self, user_id: Snowflake) -> RepoResult<bool>;

    /// Pending applications, oldest first
    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<ReviewerApplication>>;

    /// Compare-and-set `pending -> decided`. Approving also promotes the
    /// applicant to `reviewer`. Fails with `ApplicationAlreadyDecided` if the
    /// stored application is no longer pending.
    async fn decide(&self, decided: &ReviewerApplication) -> RepoResult<ReviewerApplication>;
}
