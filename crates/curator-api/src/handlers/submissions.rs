//! Submission handlers
//!
//! Intake of corrections, game submissions and FAQ submissions.

use axum::{extract::State, Json};
use curator_service::{
    CreateCorrectionRequest, CreateFaqSubmissionRequest, CreateGameSubmissionRequest,
    SubmissionResponse, SubmissionService,
};

use crate::extractors::{AuthUser, CsrfProtected, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Propose a change to one field of a game
///
/// POST /submissions/corrections
pub async fn create_correction(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<CreateCorrectionRequest>,
) -> ApiResult<Created<Json<SubmissionResponse>>> {
    let service = SubmissionService::new(state.service_context());
    let response = service.create_correction(&auth.actor, request).await?;
    Ok(Created(Json(response)))
}

/// Propose a new game or several edits to an existing one
///
/// POST /submissions/games
pub async fn create_game_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<CreateGameSubmissionRequest>,
) -> ApiResult<Created<Json<SubmissionResponse>>> {
    let service = SubmissionService::new(state.service_context());
    let response = service.create_game_submission(&auth.actor, request).await?;
    Ok(Created(Json(response)))
}

/// POST /submissions/faqs
pub async fn create_faq_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<CreateFaqSubmissionRequest>,
) -> ApiResult<Created<Json<SubmissionResponse>>> {
    let service = SubmissionService::new(state.service_context());
    let response = service.create_faq_submission(&auth.actor, request).await?;
    Ok(Created(Json(response)))
}

/// Get submission by ID
///
/// GET /submissions/{id}
pub async fn get_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<SubmissionResponse>> {
    let service = SubmissionService::new(state.service_context());
    let response = service.get(&auth.actor, id).await?;
    Ok(Json(response))
}
