//! Domain events

mod moderation_event;

pub use moderation_event::{
    ApplicationCreatedEvent, ApplicationDecidedEvent, ModerationEvent, SubmissionCreatedEvent,
    SubmissionDecidedEvent,
};
