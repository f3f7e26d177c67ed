//! Error handling utilities for repositories

use curator_core::error::DomainError;
use curator_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Unique violation, or the named user foreign key pointing at a missing row
pub fn map_insert_error<F>(
    e: SqlxError,
    user_fk: &str,
    user_id: Snowflake,
    on_unique: F,
) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() && db_err.constraint() == Some(user_fk) {
            return user_not_found(user_id);
        }
    }
    map_unique_violation(e, on_unique)
}

pub fn user_not_found(id: Snowflake) -> DomainError {
    DomainError::UserNotFound(id)
}

pub fn submission_not_found(id: Snowflake) -> DomainError {
    DomainError::SubmissionNotFound(id)
}

pub fn game_not_found(id: Snowflake) -> DomainError {
    DomainError::GameNotFound(id.to_string())
}

pub fn application_not_found(id: Snowflake) -> DomainError {
    DomainError::ApplicationNotFound(id)
}

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("metroid"), "%metroid%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
