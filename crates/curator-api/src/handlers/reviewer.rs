//! Reviewer program handlers
//!
//! Eligibility, cooldown status and the caller's own applications.

use axum::{extract::State, Json};
use curator_service::{
    ApplicationResponse, ApplicationService, CreateApplicationRequest,
    CurrentApplicationResponse, EligibilityReport, ReapplyCheck,
};

use crate::extractors::{AuthUser, CsrfProtected, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /reviewer/eligibility
pub async fn eligibility(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<EligibilityReport>> {
    let service = ApplicationService::new(state.service_context());
    Ok(Json(service.eligibility(&auth.actor).await?))
}

/// GET /reviewer/reapply
pub async fn reapply_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ReapplyCheck>> {
    let service = ApplicationService::new(state.service_context());
    Ok(Json(service.reapply_status(&auth.actor).await?))
}

/// Apply to become a reviewer
///
/// POST /reviewer/applications
pub async fn create_application(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<CreateApplicationRequest>,
) -> ApiResult<Created<Json<ApplicationResponse>>> {
    let service = ApplicationService::new(state.service_context());
    let response = service.create_application(&auth.actor, request).await?;
    Ok(Created(Json(response)))
}

/// GET /reviewer/applications/current
pub async fn current_application(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentApplicationResponse>> {
    let service = ApplicationService::new(state.service_context());
    Ok(Json(service.current_application(&auth.actor).await?))
}

/// GET /reviewer/applications/history
pub async fn application_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let service = ApplicationService::new(state.service_context());
    Ok(Json(service.application_history(&auth.actor).await?))
}
