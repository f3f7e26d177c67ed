//! Errors surfaced by moderation services

use curator_common::error::domain_status;
use curator_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A moderation rule rejected the operation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request shape the domain layer never sees, e.g. a bulk action it cannot apply
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store did not answer in time; the write may or may not have landed
    #[error("Store operation timed out")]
    Timeout,
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::Validation(_) => 400,
            Self::Timeout => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Timeout => "STORE_TIMEOUT",
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
