//! # curator-notify
//!
//! Delivery of moderation events to other services over Redis pub/sub.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Every event goes to the shared moderation channel; events
//!   about a user also go to that user's channel
//! - **Log fallback**: [`LogNotifier`] for deployments without Redis
//!
//! ## Example
//!
//! ```ignore
//! use curator_notify::{RedisNotifier, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let notifier = RedisNotifier::new(pool);
//! notifier.dispatch(&event).await?;
//! ```

pub mod notifier;
pub mod pool;
pub mod pubsub;

pub use notifier::{LogNotifier, RedisNotifier};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{
    EventEnvelope, NotifyChannel, Publisher, MODERATION_CHANNEL, USER_CHANNEL_PREFIX,
};
