//! # API Errors
//!
//! Every failure a handler can produce ends up here as an [`ApiError`] and
//! leaves the server as one JSON envelope:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ─┐                                                     │
//! │  CoreError ───────┼──► ApiError { kind, message } ──► HTTP response     │
//! │  DbError ─────────┤                                                     │
//! │  Json/Query       │     {"kind": "conflict",                            │
//! │  rejections ──────┘      "message": "Item code already exists: 'A1'"}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | kind | status |
//! |---|---|
//! | `unauthorized` | 401 |
//! | `forbidden` | 403 |
//! | `not_found` | 404 |
//! | `conflict` | 409 |
//! | `validation` | 400 |
//! | `internal` | 500 |
//!
//! Internal errors are logged with their detail; the client only ever sees
//! a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;

/// Message returned in place of any internal detail.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error category, serialized as the envelope's `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    /// HTTP status for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The error every handler returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Logs `detail` and returns the generic 500.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!("Internal error: {}", detail);
        Self::new(ErrorKind::Internal, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let kind = match &err {
            CoreError::PermissionDenied { .. }
            | CoreError::OwnerProtected { .. }
            | CoreError::OwnerDemotion { .. } => ErrorKind::Forbidden,
            CoreError::InvalidCredentials => ErrorKind::Unauthorized,
            CoreError::Validation(_) => ErrorKind::Validation,
        };
        ApiError::new(kind, err.to_string())
    }
}

/// ## Mapping
/// ```text
/// NotFound            → 404 not_found
/// UniqueViolation     → 409 conflict
/// Referenced          → 409 conflict
/// ForeignKeyViolation → 400 validation
/// everything else     → 500 internal (logged)
/// ```
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::Referenced { .. } => {
                ApiError::new(ErrorKind::Conflict, err.to_string())
            }
            DbError::ForeignKeyViolation { message } => ApiError::validation(message),
            other => ApiError::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
