//! Axum extractors for request handling
//!
//! Custom extractors for identity, CSRF protection, validation, query strings and path IDs.

mod auth;
mod csrf;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use csrf::{CsrfGuard, CsrfProtected, DoubleSubmitCsrf, CSRF_COOKIE, CSRF_HEADER};
pub use path::IdPath;
pub use query::QueryParams;
pub use validated::ValidatedJson;
