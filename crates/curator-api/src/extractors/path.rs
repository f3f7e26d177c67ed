//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use curator_core::Snowflake;

use crate::response::ApiError;

/// A single Snowflake ID taken from the path, e.g. `/submissions/:id`
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        raw.parse::<Snowflake>()
            .map(IdPath)
            .map_err(|_| ApiError::invalid_path(format!("Invalid id format: {raw}")))
    }
}
