//! Service context - dependency container for services
//!
//! Holds the repositories, the notification dispatcher, the ID generator and
//! the moderation settings needed by services.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use curator_core::traits::{
    ApplicationRepository, AuditLogRepository, FaqRepository, GameRepository,
    NotificationDispatcher, RepoResult, SubmissionRepository, UserRepository,
};
use curator_core::{EligibilityThresholds, ModerationEvent, Snowflake, SnowflakeGenerator};
use curator_db::{
    InMemoryStore, PgApplicationRepository, PgAuditLogRepository, PgFaqRepository,
    PgGameRepository, PgPool, PgSubmissionRepository, PgUserRepository,
};
use curator_notify::LogNotifier;
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Default bound on a single store operation
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (PostgreSQL or in-memory)
/// - The notification dispatcher for moderation events
/// - Snowflake generator for ID generation
/// - Eligibility thresholds and the store timeout
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    game_repo: Arc<dyn GameRepository>,
    submission_repo: Arc<dyn SubmissionRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    application_repo: Arc<dyn ApplicationRepository>,
    faq_repo: Arc<dyn FaqRepository>,

    // Notifications
    notifier: Arc<dyn NotificationDispatcher>,

    snowflake_generator: Arc<SnowflakeGenerator>,

    // Settings
    thresholds: EligibilityThresholds,
    store_timeout: Duration,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the game repository
    pub fn game_repo(&self) -> &dyn GameRepository {
        self.game_repo.as_ref()
    }

    /// Get the submission repository
    pub fn submission_repo(&self) -> &dyn SubmissionRepository {
        self.submission_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    /// Get the reviewer application repository
    pub fn application_repo(&self) -> &dyn ApplicationRepository {
        self.application_repo.as_ref()
    }

    /// Get the FAQ repository
    pub fn faq_repo(&self) -> &dyn FaqRepository {
        self.faq_repo.as_ref()
    }

    // === Settings ===

    pub fn thresholds(&self) -> &EligibilityThresholds {
        &self.thresholds
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Run a store operation under the configured timeout.
    ///
    /// A timed-out operation surfaces as [`ServiceError::Timeout`]; whether it
    /// committed is unknown to the caller.
    pub async fn store<T, F>(&self, operation: F) -> ServiceResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => {
                warn!(
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store operation timed out"
                );
                Err(ServiceError::Timeout)
            }
        }
    }

    /// Hand an event to the dispatcher without waiting for delivery
    pub fn notify(&self, event: ModerationEvent) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.dispatch(&event).await {
                warn!(
                    error = %e,
                    event_type = event.event_type(),
                    "Failed to deliver moderation event"
                );
            }
        });
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("thresholds", &self.thresholds)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    game_repo: Option<Arc<dyn GameRepository>>,
    submission_repo: Option<Arc<dyn SubmissionRepository>>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    application_repo: Option<Arc<dyn ApplicationRepository>>,
    faq_repo: Option<Arc<dyn FaqRepository>>,
    notifier: Option<Arc<dyn NotificationDispatcher>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    thresholds: EligibilityThresholds,
    store_timeout: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            game_repo: None,
            submission_repo: None,
            audit_repo: None,
            application_repo: None,
            faq_repo: None,
            notifier: None,
            snowflake_generator: None,
            thresholds: EligibilityThresholds::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Use the PostgreSQL repositories over one pool
    pub fn postgres(self, pool: PgPool) -> Self {
        self.user_repo(Arc::new(PgUserRepository::new(pool.clone())))
            .game_repo(Arc::new(PgGameRepository::new(pool.clone())))
            .submission_repo(Arc::new(PgSubmissionRepository::new(pool.clone())))
            .audit_repo(Arc::new(PgAuditLogRepository::new(pool.clone())))
            .application_repo(Arc::new(PgApplicationRepository::new(pool.clone())))
            .faq_repo(Arc::new(PgFaqRepository::new(pool)))
    }

    /// Use one in-memory store for every repository
    pub fn in_memory(self, store: Arc<InMemoryStore>) -> Self {
        self.user_repo(store.clone())
            .game_repo(store.clone())
            .submission_repo(store.clone())
            .audit_repo(store.clone())
            .application_repo(store.clone())
            .faq_repo(store)
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn game_repo(mut self, repo: Arc<dyn GameRepository>) -> Self {
        self.game_repo = Some(repo);
        self
    }

    pub fn submission_repo(mut self, repo: Arc<dyn SubmissionRepository>) -> Self {
        self.submission_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn application_repo(mut self, repo: Arc<dyn ApplicationRepository>) -> Self {
        self.application_repo = Some(repo);
        self
    }

    pub fn faq_repo(mut self, repo: Arc<dyn FaqRepository>) -> Self {
        self.faq_repo = Some(repo);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn thresholds(mut self, thresholds: EligibilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Build the ServiceContext
    ///
    /// The notifier defaults to [`LogNotifier`] and the generator to worker 0.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            game_repo: self
                .game_repo
                .ok_or_else(|| ServiceError::validation("game_repo is required"))?,
            submission_repo: self
                .submission_repo
                .ok_or_else(|| ServiceError::validation("submission_repo is required"))?,
            audit_repo: self
                .audit_repo
                .ok_or_else(|| ServiceError::validation("audit_repo is required"))?,
            application_repo: self
                .application_repo
                .ok_or_else(|| ServiceError::validation("application_repo is required"))?,
            faq_repo: self
                .faq_repo
                .ok_or_else(|| ServiceError::validation("faq_repo is required"))?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::new(0))),
            thresholds: self.thresholds,
            store_timeout: self.store_timeout,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
