//! Published FAQ handlers

use axum::{extract::State, Json};
use curator_service::{FaqEntryResponse, FaqQuery, FaqService};

use crate::extractors::QueryParams;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /faqs?category=
pub async fn list_faqs(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FaqQuery>,
) -> ApiResult<Json<Vec<FaqEntryResponse>>> {
    let service = FaqService::new(state.service_context());
    Ok(Json(service.list(query.category.as_deref()).await?))
}
