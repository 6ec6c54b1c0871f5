// Central Error Type for the Application

use crate::domain::DomainError;
use thiserror::Error;

/// Caller-facing error kind, independent of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidPriority,
    InvalidTransition,
    EmptyQueue,
    InvalidArgument,
    Conflict,
    Internal,
}

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(e) => match e {
                DomainError::InvalidStateTransition { .. } => ErrorKind::InvalidTransition,
                DomainError::InvalidPriority(_) => ErrorKind::InvalidPriority,
                DomainError::InvalidStatus(_) | DomainError::InvalidArgument(_) => {
                    ErrorKind::InvalidArgument
                }
                DomainError::EmptyQueue(_) => ErrorKind::EmptyQueue,
                DomainError::EntityNotFound { .. } => ErrorKind::NotFound,
            },
            AppError::Validation(_) | AppError::Config(_) => ErrorKind::InvalidArgument,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_kinds() {
        let err: AppError = DomainError::EmptyQueue("er".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::EmptyQueue);

        let err: AppError = DomainError::InvalidPriority("urgent".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidPriority);

        let err: AppError = DomainError::EntityNotFound {
            department: "er".to_string(),
            entity_id: "p1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("p1"));
    }

    #[test]
    fn test_app_errors_map_to_kinds() {
        assert_eq!(
            AppError::NotFound("x".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::Validation("x".to_string()).kind(),
            ErrorKind::InvalidArgument
        );
    }
}
