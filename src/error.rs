//! Error types shared across layers.
//!
//! [`AppError`] is the taxonomy surfaced at the HTTP boundary. [`StoreError`]
//! is what repositories return; anything other than a duplicate key collapses
//! into a generic internal error once it reaches the boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL format: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Custom short code '{code}' already exists")]
    CodeTaken { code: String },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
    pub fn code_taken(code: impl Into<String>) -> Self {
        Self::CodeTaken { code: code.into() }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. } | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeTaken { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            AppError::InvalidUrl { url, reason } => {
                ("invalid_url", json!({ "url": url, "reason": reason }))
            }
            AppError::CodeTaken { code } => ("code_taken", json!({ "code": code })),
            AppError::NotFound { details, .. } => ("not_found", details.clone()),
            AppError::Validation { details, .. } => ("validation_error", details.clone()),
            AppError::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

/// Errors returned by [`crate::domain::repositories::UrlRepository`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("short code '{code}' already exists")]
    DuplicateKey { code: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey { code } => AppError::code_taken(code),
            StoreError::Database(err) => {
                tracing::error!("Store error: {}", err);
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

/// Maps a sqlx error raised while inserting `code`, turning unique
/// violations into [`StoreError::DuplicateKey`].
pub fn map_insert_error(e: sqlx::Error, code: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::DuplicateKey {
            code: code.to_string(),
        };
    }

    StoreError::Database(e)
}
