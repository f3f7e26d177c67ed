//! Errors shared by the server binary and its startup path

use curator_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidToken | Self::TokenExpired => 401,
            Self::Domain(e) => domain_status(e),
            Self::Database(_)
            | Self::Notification(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => 500,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Notification(_) => "NOTIFICATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) | Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// HTTP status for a domain error.
///
/// Missing resources win over everything else; a store failure is the
/// fallback.
#[must_use]
pub fn domain_status(e: &DomainError) -> u16 {
    if e.is_not_found() {
        404
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else {
        500
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::Snowflake;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidToken.status_code(), 401);
        assert_eq!(AppError::TokenExpired.status_code(), 401);
        assert_eq!(AppError::Database("down".to_string()).status_code(), 500);
        assert_eq!(
            AppError::from(std::io::Error::other("bind")).status_code(),
            500
        );
    }

    #[test]
    fn test_domain_status_codes() {
        assert_eq!(AppError::from(DomainError::AlreadyProcessed).status_code(), 409);
        assert_eq!(AppError::from(DomainError::MissingReviewNotes).status_code(), 400);
        assert_eq!(AppError::from(DomainError::SelfReview).status_code(), 403);
        assert_eq!(
            AppError::from(DomainError::ReapplyCooldown { days_remaining: 4 }).status_code(),
            403
        );
        assert_eq!(
            AppError::from(DomainError::SubmissionNotFound(Snowflake::new(1))).status_code(),
            404
        );
        assert_eq!(
            AppError::from(DomainError::DatabaseError("down".into())).status_code(),
            500
        );
        assert_eq!(domain_status(&DomainError::PendingApplicationExists), 409);
        assert_eq!(domain_status(&DomainError::ContentTooLong { field: "answer", max: 5 }), 400);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::InvalidToken.error_code(), "INVALID_TOKEN");
        assert_eq!(
            AppError::from(DomainError::AlreadyProcessed).error_code(),
            "ALREADY_PROCESSED"
        );
        assert_eq!(
            AppError::internal(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_ERROR"
        );
    }
}
