//! Error handling for Campus Portal
//!
//! Centralized error types and their mapping onto the JSON envelope
//! `{ "success": false, "message": ... }`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{cause} ({persisted} record(s) saved before the failure)")]
    BatchAborted { persisted: usize, cause: Box<AppError> },
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Record already exists".to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Authentication(_) | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BatchAborted { cause, .. } => cause.status_code(),
        }
    }

    /// Get error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DatabaseError",
            AppError::NotFound(_) => "NotFound",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Authentication(_) => "AuthenticationError",
            AppError::Validation(_) => "ValidationError",
            AppError::Conflict(_) => "Conflict",
            AppError::Internal(_) => "InternalError",
            AppError::Serialization(_) => "SerializationError",
            AppError::Token(_) => "TokenError",
            AppError::BatchAborted { .. } => "BatchAborted",
        }
    }

    /// Check if this error should be logged as an error vs warning
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to API clients. Server-side failures are not detailed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Serialization(_) => {
                "Internal server error".to_string()
            }
            AppError::Token(_) => "Invalid token".to_string(),
            AppError::BatchAborted { persisted, cause } => format!(
                "{} ({} record(s) saved before the failure)",
                cause.public_message(),
                persisted
            ),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            crate::logging::log_error(&self.to_string(), self.error_code(), None);
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Request rejected");
        }

        let body = match &self {
            AppError::BatchAborted { persisted, .. } => json!({
                "success": false,
                "message": self.public_message(),
                "count": persisted,
            }),
            _ => json!({
                "success": false,
                "message": self.public_message(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(format!("{} not found", resource))
    }

    pub fn forbidden(message: &str) -> Self {
        AppError::Forbidden(message.to_string())
    }

    pub fn authentication_failed(message: &str) -> Self {
        AppError::Authentication(message.to_string())
    }

    pub fn validation_error(message: &str) -> Self {
        AppError::Validation(message.to_string())
    }

    pub fn conflict(message: &str) -> Self {
        AppError::Conflict(message.to_string())
    }

    pub fn internal_error(message: &str) -> Self {
        AppError::Internal(message.to_string())
    }
}
