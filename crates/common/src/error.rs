//! Error types for ArtiLink.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use crate::contract::ErrorBody;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Malformed identifiers or body shape, with optional per-field detail.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a validation error that points at a single field.
    #[must_use]
    pub fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            details: Some(json!({ field: [{ "code": code, "message": message }] })),
            message,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) | Self::Validation { .. } => "INVALID_INPUT",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to API clients. Server-side detail stays in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Unauthorized => "authentication required".to_string(),
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }

    /// Render the wire body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
            code: Some(self.error_code().to_string()),
            details: match self {
                Self::Validation { details, .. } => details.clone(),
                _ => None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        (status, Json(self.to_body())).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: "invalid input".to_string(),
            details: serde_json::to_value(&err).ok(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1))]
        question_id: i64,
    }

    #[test]
    fn test_status_codes_are_distinct_per_kind() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::invalid_field("answerId", "parse", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_message_is_not_leaked() {
        let body = AppError::Database("relation \"answer\" does not exist".into()).to_body();
        assert_eq!(body.error, "internal server error");
        assert_eq!(body.code.as_deref(), Some("INTERNAL"));
        assert!(body.details.is_none());
    }

    #[test]
    fn test_invalid_field_details() {
        let body = AppError::invalid_field("answerId", "positive_integer", "must be positive")
            .to_body();
        let details = body.details.unwrap();
        assert_eq!(details["answerId"][0]["code"], "positive_integer");
        assert_eq!(body.error, "must be positive");
    }

    #[test]
    fn test_from_validation_errors_carries_field_detail() {
        let err: AppError = Probe { question_id: 0 }.validate().unwrap_err().into();
        let body = err.to_body();
        assert_eq!(body.code.as_deref(), Some("INVALID_INPUT"));
        assert!(body.details.unwrap().get("question_id").is_some());
    }
}
