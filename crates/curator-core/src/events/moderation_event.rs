//! Moderation events - emitted after a submission or application changes state
//!
//! These events are handed to the notification dispatcher. Delivery is best
//! effort; nothing in the moderation workflow waits on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ApplicationStatus, SubmissionKind, SubmissionStatus};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationEvent {
    SubmissionCreated(SubmissionCreatedEvent),
    SubmissionDecided(SubmissionDecidedEvent),
    ApplicationCreated(ApplicationCreatedEvent),
    ApplicationDecided(ApplicationDecidedEvent),
}

impl ModerationEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SubmissionCreated(_) => "SUBMISSION_CREATED",
            Self::SubmissionDecided(_) => "SUBMISSION_DECIDED",
            Self::ApplicationCreated(_) => "APPLICATION_CREATED",
            Self::ApplicationDecided(_) => "APPLICATION_DECIDED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SubmissionCreated(e) => e.timestamp,
            Self::SubmissionDecided(e) => e.timestamp,
            Self::ApplicationCreated(e) => e.timestamp,
            Self::ApplicationDecided(e) => e.timestamp,
        }
    }

    /// User the event concerns, if it should reach a personal channel
    pub fn recipient(&self) -> Option<Snowflake> {
        match self {
            Self::SubmissionCreated(_) | Self::ApplicationCreated(_) => None,
            Self::SubmissionDecided(e) => Some(e.submitter_id),
            Self::ApplicationDecided(e) => Some(e.user_id),
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCreatedEvent {
    pub submission_id: Snowflake,
    pub kind: SubmissionKind,
    pub submitter_id: Snowflake,
    pub target_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDecidedEvent {
    pub submission_id: Snowflake,
    pub submitter_id: Snowflake,
    pub reviewer_id: Snowflake,
    pub status: SubmissionStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCreatedEvent {
    pub application_id: Snowflake,
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDecidedEvent {
    pub application_id: Snowflake,
    pub user_id: Snowflake,
    pub admin_id: Snowflake,
    pub status: ApplicationStatus,
    pub timestamp: DateTime<Utc>,
}
