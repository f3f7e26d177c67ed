//! `NotificationDispatcher` implementations

use async_trait::async_trait;
use tracing::{info, instrument};

use curator_core::{DomainError, ModerationEvent, NotificationDispatcher};

use crate::pool::RedisPool;
use crate::pubsub::Publisher;

/// Publishes events over Redis pub/sub
#[derive(Clone)]
pub struct RedisNotifier {
    publisher: Publisher,
}

impl RedisNotifier {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            publisher: Publisher::new(pool),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for RedisNotifier {
    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    async fn dispatch(&self, event: &ModerationEvent) -> Result<(), DomainError> {
        self.publisher
            .publish_event(event)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::NotificationError(e.to_string()))
    }
}

/// Writes events to the log; used when no Redis is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationDispatcher for LogNotifier {
    async fn dispatch(&self, event: &ModerationEvent) -> Result<(), DomainError> {
        info!(
            event_type = event.event_type(),
            recipient = ?event.recipient(),
            "moderation event"
        );
        Ok(())
    }
}
