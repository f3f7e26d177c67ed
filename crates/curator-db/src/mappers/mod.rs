//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects;
//!   enum columns and JSON payloads can fail to parse
//! - `*Insert` structs: prepare entity data for database operations

mod application;
mod audit_log;
mod faq;
mod game;
mod submission;
mod user;

pub use audit_log::AuditInsert;
pub use game::fields_to_json;
pub use submission::{ReviewUpdate, SubmissionInsert};

use curator_core::DomainError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Decode a JSON column
pub(crate) fn from_json<T: DeserializeOwned>(
    value: JsonValue,
    column: &str,
) -> Result<T, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::DatabaseError(format!("malformed {column} column: {e}")))
}

/// Encode a value for a JSON column
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<JsonValue, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::InternalError(e.to_string()))
}

/// Parse a text enum column
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| DomainError::DatabaseError(format!("unexpected {column} value: {value}")))
}
