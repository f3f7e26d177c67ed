//! Notification dispatcher port

use async_trait::async_trait;

use crate::error::DomainError;
use crate::events::ModerationEvent;

/// Receives moderation events for delivery to interested users.
///
/// Callers treat delivery as best effort: an error is logged, never
/// propagated into the operation that produced the event.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, event: &ModerationEvent) -> Result<(), DomainError>;
}
