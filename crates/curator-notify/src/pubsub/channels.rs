//! Pub/Sub channel definitions.

use curator_core::{ModerationEvent, Snowflake};

/// Channel every moderation event is published to
pub const MODERATION_CHANNEL: &str = "moderation:events";
/// Channel prefix for events addressed to one user
pub const USER_CHANNEL_PREFIX: &str = "moderation:user:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotifyChannel {
    /// Shared feed for reviewers and downstream consumers
    Moderation,
    /// Personal feed of one user (their decided submissions and applications)
    User(Snowflake),
}

impl NotifyChannel {
    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Moderation => MODERATION_CHANNEL.to_string(),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
        }
    }

    /// Parse a channel name; `None` for channels this crate does not publish to
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == MODERATION_CHANNEL {
            return Some(Self::Moderation);
        }
        name.strip_prefix(USER_CHANNEL_PREFIX)
            .and_then(|id| id.parse::<i64>().ok())
            .map(|id| Self::User(Snowflake::new(id)))
    }

    /// Channels an event is delivered to
    #[must_use]
    pub fn for_event(event: &ModerationEvent) -> Vec<Self> {
        let mut channels = vec![Self::Moderation];
        if let Some(user_id) = event.recipient() {
            channels.push(Self::User(user_id));
        }
        channels
    }
}

impl std::fmt::Display for NotifyChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
