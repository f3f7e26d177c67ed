//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! identity verification, the CSRF guard and the backing pools used by
//! readiness checks.

use std::sync::Arc;

use curator_common::{AppConfig, JwtService};
use curator_db::PgPool;
use curator_notify::RedisPool;
use curator_service::ServiceContext;

use crate::extractors::{CsrfGuard, DoubleSubmitCsrf};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    jwt_service: Arc<JwtService>,
    csrf_guard: Arc<dyn CsrfGuard>,
    /// `None` when running on the in-memory store
    pool: Option<PgPool>,
    /// `None` when notifications are only logged
    redis_pool: Option<RedisPool>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the default double-submit CSRF guard
    pub fn new(service_context: ServiceContext, jwt_service: JwtService, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            csrf_guard: Arc::new(DoubleSubmitCsrf),
            pool: None,
            redis_pool: None,
            config: Arc::new(config),
        }
    }

    /// Attach the PostgreSQL pool checked by `/health/ready`
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Attach the Redis pool checked by `/health/ready`
    pub fn with_redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    /// Replace the CSRF guard
    pub fn with_csrf_guard(mut self, guard: Arc<dyn CsrfGuard>) -> Self {
        self.csrf_guard = guard;
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn csrf_guard(&self) -> &dyn CsrfGuard {
        self.csrf_guard.as_ref()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("postgres", &self.pool.is_some())
            .field("redis", &self.redis_pool.is_some())
            .field("config", &"AppConfig")
            .finish()
    }
}
