use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::MessageResponse;
use crate::services::{AccountError, AuthError, EventError, ImportError};

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    /// Duplicate unique key. Answered as 400; clients have never been
    /// sent a 409 and some depend on that.
    Conflict(String),

    /// Missing, malformed, or failed credentials/token.
    Unauthenticated(String),

    /// Valid token, wrong role for the endpoint.
    Forbidden(String),

    NotFound(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) | ApiError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            // Both auth failures answer 401; the distinction only
            // matters for logging.
            ApiError::Unauthenticated(msg) | ApiError::Forbidden(msg) => {
                (StatusCode::UNAUTHORIZED, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        ApiError::Unauthenticated(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound(msg) => ApiError::NotFound(msg),
            AuthError::InvalidPassword | AuthError::InvalidOldPassword => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Conflict(msg) => ApiError::Conflict(msg),
            AccountError::NotFound(msg) => ApiError::NotFound(msg),
            AccountError::Validation(msg) => ApiError::ValidationError(msg),
            AccountError::Database(msg) => ApiError::DatabaseError(msg),
            AccountError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MissingFile
            | ImportError::UnsupportedExtension
            | ImportError::EmptySheet
            | ImportError::Unreadable(_) => ApiError::ValidationError(err.to_string()),
            ImportError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(msg) => ApiError::ValidationError(msg),
            EventError::Conflict(msg) => ApiError::Conflict(msg),
            EventError::NotFound(msg) => ApiError::NotFound(msg),
            EventError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}
