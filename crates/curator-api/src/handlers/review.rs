//! Review handlers
//!
//! The grouped work queue and the decision endpoints. A decision that loses
//! the race to another reviewer answers `409`; the client should refresh
//! rather than retry.

use axum::{extract::State, Json};
use curator_service::{
    BatchDecisionResponse, BatchReviewRequest, ReviewDecisionRequest, ReviewQueueQuery,
    ReviewQueueResponse, ReviewService, SetAllActionsRequest, SubmissionResponse,
    SubmissionService,
};

use crate::extractors::{AuthUser, CsrfProtected, QueryParams, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Pending submissions, grouped into batches
///
/// GET /review/queue
pub async fn review_queue(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ReviewQueueQuery>,
) -> ApiResult<Json<ReviewQueueResponse>> {
    let service = SubmissionService::new(state.service_context());
    let response = service.review_queue(&auth.actor, &query).await?;
    Ok(Json(response))
}

/// Decide one submission
///
/// POST /review/decisions
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<ReviewDecisionRequest>,
) -> ApiResult<Json<SubmissionResponse>> {
    let service = ReviewService::new(state.service_context());
    let response = service.decide(&auth.actor, &request).await?;
    Ok(Json(response))
}

/// Decide several submissions; the response carries one result per item
///
/// POST /review/decisions/batch
pub async fn decide_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<BatchReviewRequest>,
) -> ApiResult<Json<BatchDecisionResponse>> {
    let service = ReviewService::new(state.service_context());
    let response = service.decide_batch(&auth.actor, &request.reviews).await?;
    Ok(Json(response))
}

/// Apply one action to every listed submission
///
/// POST /review/decisions/all
pub async fn decide_all(
    State(state): State<AppState>,
    auth: AuthUser,
    _csrf: CsrfProtected,
    ValidatedJson(request): ValidatedJson<SetAllActionsRequest>,
) -> ApiResult<Json<BatchDecisionResponse>> {
    let service = ReviewService::new(state.service_context());
    let response = service.set_all_actions(&auth.actor, &request).await?;
    Ok(Json(response))
}
