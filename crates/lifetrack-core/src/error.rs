//! Core error types.

use thiserror::Error;

use crate::security::SecurityError;

/// Core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Document (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Record already exists.
    #[error("{0}")]
    Conflict(String),

    /// Authorization or authentication failure.
    #[error(transparent)]
    Security(#[from] SecurityError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a policy or identity denial.
    pub fn is_security(&self) -> bool {
        matches!(self, Error::Security(_))
    }
}

impl From<sled::transaction::TransactionError<Error>> for Error {
    fn from(err: sled::transaction::TransactionError<Error>) -> Self {
        match err {
            sled::transaction::TransactionError::Abort(e) => e,
            sled::transaction::TransactionError::Storage(e) => Error::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("food 42".to_string());
        assert_eq!(err.to_string(), "food 42 not found");

        let err = Error::Validation("Food name is required".to_string());
        assert_eq!(err.to_string(), "Food name is required");
    }

    #[test]
    fn test_abort_unwraps_inner_error() {
        let err: Error = sled::transaction::TransactionError::Abort(Error::Conflict(
            "duplicate".to_string(),
        ))
        .into();
        assert!(matches!(err, Error::Conflict(msg) if msg == "duplicate"));
    }

    #[test]
    fn test_security_passthrough() {
        let err: Error = SecurityError::PermissionDenied("admin access is required".into()).into();
        assert!(err.is_security());
        assert!(err.to_string().contains("admin access"));
    }
}
