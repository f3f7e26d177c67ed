//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::{NotifyChannel, MODERATION_CHANNEL, USER_CHANNEL_PREFIX};
pub use publisher::{EventEnvelope, Publisher};
