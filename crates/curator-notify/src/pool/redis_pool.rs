//! Connection pool behind the notification publisher.
//!
//! Publishing runs off the request path, but a stalled Redis must not pile
//! up tasks, so waiting for a connection is bounded.

use std::time::Duration;

use deadpool_redis::{Config, Pool, Runtime};

/// Pool settings for the notification transport
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    pub max_connections: usize,
    /// Longest a publish waits for a free or new connection
    pub wait_timeout: Duration,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 16,
            wait_timeout: Duration::from_secs(2),
        }
    }
}

impl From<&curator_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &curator_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("No Redis connection available: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Pooled Redis connections for publishing moderation events
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    /// Build the pool. No connection is opened until the first publish.
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .wait_timeout(Some(config.wait_timeout))
            .create_timeout(Some(config.wait_timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        tracing::info!(
            url = %redacted_url(&config.url),
            max_connections = config.max_connections,
            wait_timeout_ms = config.wait_timeout.as_millis() as u64,
            "Redis notification pool created"
        );

        Ok(Self { pool })
    }

    pub fn from_config(config: &curator_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    #[must_use]
    pub fn status(&self) -> deadpool_redis::Status {
        self.pool.status()
    }

    /// Round-trip a PING; used by the readiness probe
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

/// Host part of a Redis URL, without credentials
fn redacted_url(url: &str) -> &str {
    url.rsplit_once('@').map_or(url, |(_, host)| host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_redis_config() {
        let redis_config = curator_common::RedisConfig {
            url: "redis://localhost:6380".to_string(),
            max_connections: 32,
        };
        let pool_config = RedisPoolConfig::from(&redis_config);
        assert_eq!(pool_config.url, "redis://localhost:6380");
        assert_eq!(pool_config.max_connections, 32);
        assert_eq!(pool_config.wait_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_redacted_url() {
        assert_eq!(redacted_url("redis://user:pw@cache:6379"), "cache:6379");
        assert_eq!(redacted_url("redis://cache:6379"), "redis://cache:6379");
    }

    #[tokio::test]
    async fn test_pool_creation_is_lazy() {
        let pool = RedisPool::new(RedisPoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_connections: 2,
            wait_timeout: Duration::from_millis(50),
        })
        .unwrap();
        assert_eq!(pool.status().size, 0);
    }
}
