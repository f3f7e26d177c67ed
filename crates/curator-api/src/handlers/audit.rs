//! Audit log handlers

use axum::{extract::State, Json};
use curator_service::{
    AuditLogEntryResponse, AuditLogPageResponse, AuditLogQueryParams, AuditService,
};

use crate::extractors::{AuthUser, IdPath, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// Filtered, sorted audit entries
///
/// GET /audit-log
pub async fn list_audit_log(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<AuditLogQueryParams>,
) -> ApiResult<Json<AuditLogPageResponse>> {
    let service = AuditService::new(state.service_context());
    let response = service.list(&auth.actor, params).await?;
    Ok(Json(response))
}

/// GET /audit-log/submissions/{id}
pub async fn submission_audit_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(submission_id): IdPath,
) -> ApiResult<Json<AuditLogEntryResponse>> {
    let service = AuditService::new(state.service_context());
    let response = service.for_submission(&auth.actor, submission_id).await?;
    Ok(Json(response))
}
