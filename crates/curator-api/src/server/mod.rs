//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::sync::Arc;

use axum::Router;
use curator_common::{AppConfig, AppError, JwtService};
use curator_core::SnowflakeGenerator;
use curator_db::PoolSettings;
use curator_notify::{RedisNotifier, RedisPool};
use curator_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes());

    Ok(api.merge(health).with_state(state))
}

/// Connect PostgreSQL and (optionally) Redis and build the AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let settings = PoolSettings::new(
        config.database.url.clone(),
        config.database.max_connections,
        config.database.min_connections,
    );
    let pool = curator_db::connect(&settings)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let mut builder = ServiceContextBuilder::new()
        .postgres(pool.clone())
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .thresholds(config.moderation.thresholds())
        .store_timeout(config.moderation.store_timeout());

    let redis_pool = match &config.redis {
        Some(redis_config) => {
            info!("Connecting to Redis...");
            let redis_pool = RedisPool::from_config(redis_config)
                .map_err(|e| AppError::Notification(e.to_string()))?;
            builder = builder.notifier(Arc::new(RedisNotifier::new(redis_pool.clone())));
            info!("Redis notifications enabled");
            Some(redis_pool)
        }
        None => {
            warn!("REDIS_URL not set; moderation events will only be logged");
            None
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    let mut state = AppState::new(service_context, jwt_service, config).with_pool(pool);
    if let Some(redis_pool) = redis_pool {
        state = state.with_redis_pool(redis_pool);
    }
    Ok(state)
}

/// Serve the application on an already-bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        error!(%addr, error = %e, "Failed to bind");
    })?;

    serve(listener, app).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
