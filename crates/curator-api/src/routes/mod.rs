//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, audit, faqs, health, review, reviewer, submissions};
use crate::state::AppState;

/// Create the main API router (health is separate so it bypasses rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(submission_routes())
        .merge(review_routes())
        .merge(audit_routes())
        .merge(reviewer_routes())
        .merge(admin_routes())
        .route("/faqs", get(faqs::list_faqs))
}

/// Submission intake routes
fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions/corrections", post(submissions::create_correction))
        .route("/submissions/games", post(submissions::create_game_submission))
        .route("/submissions/faqs", post(submissions::create_faq_submission))
        .route("/submissions/:id", get(submissions::get_submission))
}

/// Review queue and decision routes
fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/review/queue", get(review::review_queue))
        .route("/review/decisions", post(review::decide))
        .route("/review/decisions/batch", post(review::decide_batch))
        .route("/review/decisions/all", post(review::decide_all))
}

fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/audit-log", get(audit::list_audit_log))
        .route("/audit-log/submissions/:id", get(audit::submission_audit_entry))
}

/// Reviewer program routes for the caller
fn reviewer_routes() -> Router<AppState> {
    Router::new()
        .route("/reviewer/eligibility", get(reviewer::eligibility))
        .route("/reviewer/reapply", get(reviewer::reapply_status))
        .route("/reviewer/applications", post(reviewer::create_application))
        .route("/reviewer/applications/current", get(reviewer::current_application))
        .route("/reviewer/applications/history", get(reviewer::application_history))
}

/// Admin routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/applications", get(admin::pending_applications))
        .route("/admin/applications/:id/decision", post(admin::decide_application))
}
