//! Redis Pub/Sub publisher.
//!
//! Publishes moderation events as JSON envelopes.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use curator_core::ModerationEvent;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::NotifyChannel;

/// Wire format of a published event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event type name (e.g., "SUBMISSION_DECIDED")
    pub event_type: String,
    pub data: ModerationEvent,
    pub published_at: DateTime<Utc>,
}

impl EventEnvelope {
    #[must_use]
    pub fn new(event: &ModerationEvent) -> Self {
        Self {
            event_type: event.event_type().to_string(),
            data: event.clone(),
            published_at: Utc::now(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an envelope to a channel
    pub async fn publish(&self, channel: &NotifyChannel, envelope: &EventEnvelope) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = envelope.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %envelope.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish to multiple channels over one connection
    pub async fn publish_many(
        &self,
        channels: &[NotifyChannel],
        envelope: &EventEnvelope,
    ) -> RedisResult<u32> {
        let payload = envelope.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %envelope.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish a moderation event to every channel it belongs on
    pub async fn publish_event(&self, event: &ModerationEvent) -> RedisResult<u32> {
        let envelope = EventEnvelope::new(event);
        self.publish_many(&NotifyChannel::for_event(event), &envelope)
            .await
    }
}
