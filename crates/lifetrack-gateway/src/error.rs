//! Error handling for the gateway.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifetrack_core::{Error, SecurityError};
use serde::Serialize;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error.
    Internal(String),
    /// Bad request.
    BadRequest(String),
    /// Not found.
    NotFound(String),
    /// Conflicts with existing data.
    Conflict(String),
    /// No usable identity.
    Unauthorized(String),
    /// Identity known, action refused.
    Forbidden {
        /// Machine-readable denial kind.
        code: &'static str,
        /// Message naming the item and the reason.
        message: String,
    },
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Forbidden { code, message } => (StatusCode::FORBIDDEN, code, message),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%message, "request failed");
        }

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        let code = match &err {
            SecurityError::Unauthenticated(_) => return AppError::Unauthorized(err.to_string()),
            SecurityError::NotOwner { .. } => "NOT_OWNER",
            SecurityError::NotEligible { .. } => "NOT_ELIGIBLE",
            SecurityError::PermissionDenied(_) => "FORBIDDEN",
            SecurityError::Suspended { .. } => "SUSPENDED",
        };
        AppError::Forbidden {
            code,
            message: err.to_string(),
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Security(err) => err.into(),
            Error::NotFound(_) => AppError::NotFound(err.to_string()),
            Error::Validation(msg) => AppError::BadRequest(msg),
            Error::Conflict(msg) => AppError::Conflict(msg),
            Error::Storage(_) | Error::Serialization(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("JSON error: {}", rejection.body_text()))
    }
}
