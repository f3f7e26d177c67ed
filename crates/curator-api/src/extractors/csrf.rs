//! CSRF protection for mutating endpoints
//!
//! The guard is a service held in [`AppState`]; handlers opt in by taking a
//! [`CsrfProtected`] argument.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use crate::response::ApiError;
use crate::state::AppState;

/// Header carrying the client's copy of the token
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Cookie carrying the server-issued token
pub const CSRF_COOKIE: &str = "csrf_token";

/// Decides whether a request carries a valid CSRF token
pub trait CsrfGuard: Send + Sync {
    fn verify(&self, header_token: Option<&str>, cookie_token: Option<&str>) -> bool;
}

/// Double-submit check: the header must repeat the cookie value
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleSubmitCsrf;

impl CsrfGuard for DoubleSubmitCsrf {
    fn verify(&self, header_token: Option<&str>, cookie_token: Option<&str>) -> bool {
        match (header_token, cookie_token) {
            (Some(header), Some(cookie)) if !header.is_empty() => {
                constant_time_eq(header.as_bytes(), cookie.as_bytes())
            }
            _ => false,
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Marker extractor that rejects requests failing the CSRF guard
#[derive(Debug, Clone, Copy)]
pub struct CsrfProtected;

#[async_trait]
impl<S> FromRequestParts<S> for CsrfProtected
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok());
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(CSRF_COOKIE).map(|c| c.value());

        let app_state = AppState::from_ref(state);
        if app_state.csrf_guard().verify(header, cookie) {
            Ok(CsrfProtected)
        } else {
            tracing::warn!(uri = %parts.uri, "CSRF check failed");
            Err(ApiError::InvalidCsrf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_submit() {
        let guard = DoubleSubmitCsrf;
        assert!(guard.verify(Some("abc123"), Some("abc123")));
        assert!(!guard.verify(Some("abc123"), Some("abc124")));
        assert!(!guard.verify(Some("abc"), Some("abc123")));
        assert!(!guard.verify(None, Some("abc123")));
        assert!(!guard.verify(Some("abc123"), None));
        assert!(!guard.verify(Some(""), Some("")));
    }
}
