//! Admin handlers for reviewer applications

use axum::{extract::State, Json};
use curator_service::{
    ApplicationResponse, ApplicationService, DecideApplicationRequest, PendingApplicationsQuery,
};

use crate::extractors::{AuthUser, CsrfProtected, IdPath, QueryParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Pending applications, oldest first
///
/// GET /admin/applications
pub async fn pending_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<PendingApplicationsQuery>,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let service = ApplicationService::new(state.service_context());
    let response = service.list_pending(&auth.actor, query.limit).await?;
    Ok(Json(response))
}

/// Approve or reject an application
///
/// POST /admin/applications/{id}/decision
pub async fn decide_application(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    IdPath(application_id): IdPath,
    ValidatedJson(request): ValidatedJson<DecideApplicationRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let service = ApplicationService::new(state.service_context());
    let response = service
        .decide_application(&auth.actor, application_id, request)
        .await?;
    Ok(Json(response))
}
