//! Test fixtures and request bodies
//!
//! Provides reusable test data for integration tests.

use chrono::{Duration, Utc};
use curator_core::{Actor, FieldValue, Game, Role, Snowflake, UserAggregate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::helpers::TestServer;

/// Error body returned by every failing endpoint
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Seed a game titled `title` (slug derived from it) with developer "Acme"
pub async fn seed_game(server: &TestServer, id: i64, title: &str) -> Game {
    let game =
        Game::new(Snowflake::new(id), title).with_field("developer", FieldValue::text("Acme"));
    server.store.seed_game(game.clone()).await;
    game
}

/// Seed a user old and active enough to pass the default eligibility thresholds
pub async fn seed_veteran(server: &TestServer, id: i64, name: &str) -> Actor {
    let mut user = UserAggregate::new(Snowflake::new(id), name, Utc::now() - Duration::days(90));
    user.submissions_count = 20;
    user.approved_count = 18;
    user.rejected_count = 2;
    server.store.seed_user(user).await;
    Actor::new(Snowflake::new(id), name, Role::User)
}

pub fn correction_body(game_slug: &str, field: &str, value: &str) -> Value {
    json!({
        "game_slug": game_slug,
        "field": field,
        "new_value": { "type": "text", "value": value },
        "justification": "Checked the box art"
    })
}

pub fn faq_body(question: &str, answer: &str) -> Value {
    json!({
        "question": question,
        "answer": answer,
        "category": "gameplay"
    })
}

pub fn decision_body(submission_id: &str, status: &str, notes: Option<&str>) -> Value {
    json!({
        "submission_id": submission_id,
        "status": status,
        "review_notes": notes
    })
}

pub fn application_body() -> Value {
    json!({
        "motivation": "I keep the release dates honest",
        "experience": "Five years of wiki maintenance"
    })
}

/// `id` of a created resource
pub fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap_or_default().to_string()
}
