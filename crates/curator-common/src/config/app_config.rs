//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use curator_core::EligibilityThresholds;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Without Redis, notifications are only logged
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub moderation: ModerationConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration. Tokens are issued by the sign-in service; this
/// server only verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Reviewer eligibility thresholds and store limits
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    #[serde(default = "default_min_account_age_days")]
    pub min_account_age_days: i64,
    #[serde(default = "default_min_submissions")]
    pub min_submissions: i64,
    #[serde(default = "default_min_approved")]
    pub min_approved: i64,
    #[serde(default = "default_min_approval_rate")]
    pub min_approval_rate: f64,
    #[serde(default = "default_reapply_cooldown_days")]
    pub reapply_cooldown_days: i64,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl ModerationConfig {
    #[must_use]
    pub fn thresholds(&self) -> EligibilityThresholds {
        EligibilityThresholds {
            min_account_age_days: self.min_account_age_days,
            min_submissions: self.min_submissions,
            min_approved: self.min_approved,
            min_approval_rate: self.min_approval_rate,
            reapply_cooldown_days: self.reapply_cooldown_days,
        }
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            min_account_age_days: default_min_account_age_days(),
            min_submissions: default_min_submissions(),
            min_approved: default_min_approved(),
            min_approval_rate: default_min_approval_rate(),
            reapply_cooldown_days: default_reapply_cooldown_days(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "curator".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_min_account_age_days() -> i64 {
    30
}

fn default_min_submissions() -> i64 {
    10
}

fn default_min_approved() -> i64 {
    5
}

fn default_min_approval_rate() -> f64 {
    0.7
}

fn default_reapply_cooldown_days() -> i64 {
    30
}

fn default_store_timeout_ms() -> u64 {
    5000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or a
    /// moderation threshold cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let moderation = ModerationConfig {
            min_account_age_days: strict(&var, "ELIGIBILITY_MIN_ACCOUNT_AGE_DAYS")?
                .unwrap_or_else(default_min_account_age_days),
            min_submissions: strict(&var, "ELIGIBILITY_MIN_SUBMISSIONS")?
                .unwrap_or_else(default_min_submissions),
            min_approved: strict(&var, "ELIGIBILITY_MIN_APPROVED")?
                .unwrap_or_else(default_min_approved),
            min_approval_rate: strict(&var, "ELIGIBILITY_MIN_APPROVAL_RATE")?
                .unwrap_or_else(default_min_approval_rate),
            reapply_cooldown_days: strict(&var, "REVIEWER_REAPPLY_COOLDOWN_DAYS")?
                .unwrap_or_else(default_reapply_cooldown_days),
            store_timeout_ms: strict(&var, "MODERATION_STORE_TIMEOUT_MS")?
                .unwrap_or_else(default_store_timeout_ms),
        };
        if !(0.0..=1.0).contains(&moderation.min_approval_rate) {
            return Err(ConfigError::InvalidValue(
                "ELIGIBILITY_MIN_APPROVAL_RATE",
                moderation.min_approval_rate.to_string(),
            ));
        }
        if moderation.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "MODERATION_STORE_TIMEOUT_MS",
                "0".to_string(),
            ));
        }
        let worker_id: u16 = strict(&var, "WORKER_ID")?.unwrap_or(0);
        if worker_id > curator_core::MAX_WORKER_ID {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: var("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port: lenient(&var, "API_PORT").ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: lenient(&var, "DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(default_max_connections),
                min_connections: lenient(&var, "DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(default_min_connections),
            },
            redis: var("REDIS_URL").map(|url| RedisConfig {
                url,
                max_connections: lenient(&var, "REDIS_MAX_CONNECTIONS")
                    .unwrap_or_else(default_redis_max_connections),
            }),
            jwt: JwtConfig {
                secret: var("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: lenient(&var, "JWT_ACCESS_TOKEN_EXPIRY")
                    .unwrap_or_else(default_access_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: lenient(&var, "RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: lenient(&var, "RATE_LIMIT_BURST").unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id,
            },
            moderation,
        })
    }
}

/// Parse an optional variable, treating a malformed value as unset
fn lenient<T, V>(var: &V, key: &'static str) -> Option<T>
where
    T: FromStr,
    V: Fn(&'static str) -> Option<String>,
{
    var(key).and_then(|s| s.trim().parse().ok())
}

/// Parse an optional variable, failing on a present but malformed value
fn strict<T, V>(var: &V, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    V: Fn(&'static str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
