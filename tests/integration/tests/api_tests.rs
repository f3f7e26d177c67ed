//! API Integration Tests
//!
//! Each test starts its own server over a fresh in-memory store, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use curator_core::{FieldValue, GameRepository, Role, Snowflake, UserRepository};
use integration_tests::{
    application_body, assert_error, assert_json, assert_status, correction_body, decision_body,
    faq_body, id_of, seed_game, seed_veteran, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert!(response.headers().contains_key("x-request-id"));
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_without_redis() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["redis"], "disabled");
}

// ============================================================================
// Identity and CSRF
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let response = server.get_api("/review/queue").await.unwrap();
    let err = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(err.error.code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_mutation_without_csrf_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    seed_game(&server, 100, "Foo").await;

    let response = server
        .post_auth_without_csrf(
            "/submissions/corrections",
            &ada,
            &correction_body("foo", "developer", "Acme Corp"),
        )
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "INVALID_CSRF_TOKEN");
}

// ============================================================================
// Intake and Review
// ============================================================================

#[tokio::test]
async fn test_batch_approval_updates_game_and_audit_log() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    let rev = server.user(2, "rev", Role::Reviewer).await;
    seed_game(&server, 100, "Foo").await;

    let mut ids = Vec::new();
    for (field, value) in [("developer", "Acme Corp"), ("publisher", "Globex")] {
        let response = server
            .post_auth(
                "/submissions/corrections",
                &ada,
                &correction_body("foo", field, value),
            )
            .await
            .unwrap();
        let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(created["status"], "pending");
        ids.push(id_of(&created));
    }

    // Plain users cannot see the queue
    let response = server.get_auth("/review/queue", &ada).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get_auth("/review/queue", &rev).await.unwrap();
    let queue: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(queue["total_submissions"], 2);
    assert_eq!(queue["items"].as_array().unwrap().len(), 1);
    assert_eq!(queue["items"][0]["type"], "batch");

    // A one-item page still carries the whole batch
    let response = server.get_auth("/review/queue?limit=1", &rev).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["submissions"].as_array().unwrap().len(), 2);

    let reviews: Vec<Value> = ids
        .iter()
        .map(|id| decision_body(id, "approved", None))
        .collect();
    let response = server
        .post_auth("/review/decisions/batch", &rev, &json!({ "reviews": reviews }))
        .await
        .unwrap();
    let batch: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(batch["committed"], 2);
    assert_eq!(batch["failed"], 0);

    let game = GameRepository::find_by_id(server.store.as_ref(), Snowflake::new(100))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.field_value("developer"), FieldValue::text("Acme Corp"));
    assert_eq!(game.field_value("publisher"), FieldValue::text("Globex"));

    let submitter = UserRepository::find_by_id(server.store.as_ref(), ada.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(submitter.approved_count, 2);

    let response = server.get_auth("/audit-log", &rev).await.unwrap();
    let page: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["entries"].as_array().unwrap().len(), 2);

    let response = server
        .get_auth(&format!("/audit-log/submissions/{}", ids[0]), &rev)
        .await
        .unwrap();
    let entry: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(entry["status"], "approved");
    assert_eq!(entry["field"], "developer");
}

#[tokio::test]
async fn test_batch_item_with_oversized_notes_fails_alone() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    let rev = server.user(2, "rev", Role::Reviewer).await;
    seed_game(&server, 100, "Foo").await;

    let mut ids = Vec::new();
    for (field, value) in [("developer", "Acme Corp"), ("publisher", "Globex")] {
        let response = server
            .post_auth(
                "/submissions/corrections",
                &ada,
                &correction_body("foo", field, value),
            )
            .await
            .unwrap();
        let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(id_of(&created));
    }

    let long_notes = "x".repeat(2001);
    let reviews = vec![
        decision_body(&ids[0], "approved", Some(&long_notes)),
        decision_body(&ids[1], "approved", None),
    ];
    let response = server
        .post_auth("/review/decisions/batch", &rev, &json!({ "reviews": reviews }))
        .await
        .unwrap();
    let batch: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(batch["committed"], 1);
    assert_eq!(batch["failed"], 1);
    assert_eq!(batch["results"][0]["outcome"], "validation_error");
    assert_eq!(batch["results"][0]["error"]["code"], "CONTENT_TOO_LONG");
    assert_eq!(batch["results"][1]["outcome"], "committed");

    let game = GameRepository::find_by_id(server.store.as_ref(), Snowflake::new(100))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.field_value("developer"), FieldValue::text("Acme"));
    assert_eq!(game.field_value("publisher"), FieldValue::text("Globex"));
}

#[tokio::test]
async fn test_second_decision_conflicts() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    let rev = server.user(2, "rev", Role::Reviewer).await;
    let other = server.user(3, "other", Role::Reviewer).await;
    seed_game(&server, 100, "Foo").await;

    let response = server
        .post_auth(
            "/submissions/corrections",
            &ada,
            &correction_body("foo", "developer", "Acme Corp"),
        )
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let id = id_of(&created);

    let response = server
        .post_auth("/review/decisions", &rev, &decision_body(&id, "approved", None))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_auth(
            "/review/decisions",
            &other,
            &decision_body(&id, "rejected", Some("duplicate")),
        )
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "ALREADY_PROCESSED");

    let response = server
        .get_auth(&format!("/submissions/{id}"), &ada)
        .await
        .unwrap();
    let submission: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(submission["status"], "approved");
    assert_eq!(submission["review"]["reviewer_id"], rev.id.to_string());
}

#[tokio::test]
async fn test_reject_requires_notes() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    let rev = server.user(2, "rev", Role::Reviewer).await;
    seed_game(&server, 100, "Foo").await;

    let response = server
        .post_auth(
            "/submissions/corrections",
            &ada,
            &correction_body("foo", "developer", "Acme Corp"),
        )
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/review/decisions",
            &rev,
            &decision_body(&id_of(&created), "rejected", Some("   ")),
        )
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "MISSING_REVIEW_NOTES");
}

#[tokio::test]
async fn test_self_review_is_forbidden() {
    let server = TestServer::start().await.unwrap();
    let rev = server.user(2, "rev", Role::Reviewer).await;
    seed_game(&server, 100, "Foo").await;

    let response = server
        .post_auth(
            "/submissions/corrections",
            &rev,
            &correction_body("foo", "developer", "Acme Corp"),
        )
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/review/decisions",
            &rev,
            &decision_body(&id_of(&created), "approved", None),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_invalid_requests() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;

    let response = server
        .post_auth("/submissions/corrections", &ada, &correction_body("foo", "", "X"))
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "VALIDATION_ERROR");
    assert!(err.error.details.is_some());

    let response = server.get_auth("/submissions/not-a-number", &ada).await.unwrap();
    let err = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "INVALID_PATH_PARAMETER");

    let response = server.get_auth("/submissions/42", &ada).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_approved_faq_is_published() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;
    let rev = server.user(2, "rev", Role::Reviewer).await;

    let response = server
        .post_auth(
            "/submissions/faqs",
            &ada,
            &faq_body("Is there co-op?", "Two players, split screen."),
        )
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/review/decisions/all",
            &rev,
            &json!({ "submission_ids": [id_of(&created)], "status": "approved" }),
        )
        .await
        .unwrap();
    let batch: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(batch["committed"], 1);

    let response = server.get_api("/faqs?category=gameplay").await.unwrap();
    let faqs: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0]["question"], "Is there co-op?");
}

// ============================================================================
// Reviewer Applications
// ============================================================================

#[tokio::test]
async fn test_new_user_is_not_eligible() {
    let server = TestServer::start().await.unwrap();
    let ada = server.user(1, "ada", Role::User).await;

    let response = server.get_auth("/reviewer/eligibility", &ada).await.unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["eligible"], false);

    let response = server
        .post_auth("/reviewer/applications", &ada, &application_body())
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "NOT_ELIGIBLE");
    let missing = err.error.details.unwrap()["missing_requirements"]
        .as_array()
        .unwrap()
        .len();
    assert!(missing > 0);
}

#[tokio::test]
async fn test_application_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let vet = seed_veteran(&server, 1, "vet").await;
    let admin = server.user(9, "root", Role::Admin).await;

    let response = server
        .post_auth("/reviewer/applications", &vet, &application_body())
        .await
        .unwrap();
    let application: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(application["status"], "pending");

    let response = server
        .post_auth("/reviewer/applications", &vet, &application_body())
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "PENDING_APPLICATION_EXISTS");

    // Only admins see the pending list
    let response = server.get_auth("/admin/applications", &vet).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get_auth("/admin/applications", &admin).await.unwrap();
    let pending: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pending.len(), 1);

    let response = server
        .post_auth(
            &format!("/admin/applications/{}/decision", id_of(&application)),
            &admin,
            &json!({ "status": "approved" }),
        )
        .await
        .unwrap();
    let decided: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(decided["status"], "approved");

    let user = UserRepository::find_by_id(server.store.as_ref(), vet.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, Role::Reviewer);

    let response = server
        .get_auth("/reviewer/applications/current", &vet)
        .await
        .unwrap();
    let current: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(current["application"]["status"], "approved");

    let response = server
        .get_auth("/reviewer/applications/history", &vet)
        .await
        .unwrap();
    let history: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_rejection_starts_cooldown() {
    let server = TestServer::start().await.unwrap();
    let vet = seed_veteran(&server, 1, "vet").await;
    let admin = server.user(9, "root", Role::Admin).await;

    let response = server
        .post_auth("/reviewer/applications", &vet, &application_body())
        .await
        .unwrap();
    let application: Value = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/admin/applications/{}/decision", id_of(&application)),
            &admin,
            &json!({ "status": "rejected", "admin_notes": "Needs more history" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/reviewer/reapply", &vet).await.unwrap();
    let status: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status["can_reapply"], false);
    assert_eq!(status["days_until_reapply"], 30);

    let response = server.get_auth("/reviewer/eligibility", &vet).await.unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["eligible"], false);
    assert!(report["missing_requirements"][0]
        .as_str()
        .unwrap()
        .contains("cooldown"));

    let response = server
        .post_auth("/reviewer/applications", &vet, &application_body())
        .await
        .unwrap();
    let err = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "REAPPLY_COOLDOWN");
    assert_eq!(err.error.details.unwrap()["days_remaining"], 30);
}
