//! Shared fixtures for service tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use curator_core::{
    Actor, DomainError, FieldValue, Game, ModerationEvent, NotificationDispatcher, Role,
    Snowflake, UserAggregate,
};
use curator_db::InMemoryStore;

use crate::services::{ServiceContext, ServiceContextBuilder};

/// Forwards every dispatched event to a channel
pub struct RecordingNotifier {
    tx: UnboundedSender<ModerationEvent>,
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn dispatch(&self, event: &ModerationEvent) -> Result<(), DomainError> {
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub events: UnboundedReceiver<ModerationEvent>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let (tx, events) = unbounded_channel();
        let ctx = ServiceContextBuilder::new()
            .in_memory(store.clone())
            .notifier(Arc::new(RecordingNotifier { tx }))
            .build()
            .unwrap();
        Self { ctx, store, events }
    }

    /// Wait for the next spawned notification
    pub async fn next_event(&mut self) -> ModerationEvent {
        tokio::time::timeout(Duration::from_secs(1), self.events.recv())
            .await
            .expect("no event within a second")
            .expect("notifier dropped")
    }

    pub async fn user(&self, id: i64, name: &str, role: Role) -> Actor {
        self.store
            .seed_user(UserAggregate::new(Snowflake::new(id), name, Utc::now()).with_role(role))
            .await;
        Actor::new(Snowflake::new(id), name, role)
    }

    pub async fn seed_user(&self, user: UserAggregate) {
        self.store.seed_user(user).await;
    }

    pub async fn game(&self, id: i64, title: &str) -> Game {
        let game = Game::new(Snowflake::new(id), title)
            .with_field("developer", FieldValue::text("Acme"));
        self.store.seed_game(game.clone()).await;
        game
    }
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(days)
}
