//! Uniform JSON error envelope for all failure responses.
//!
//! Every error leaving the API, whether a domain failure or an unexpected one,
//! is translated here into the same body shape:
//!
//! ```json
//! {
//!   "statusCode": 400,
//!   "message": "File is required",
//!   "error": "Bad Request",
//!   "timestamp": "2026-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! `message` is a plain string, except for request validation failures where it
//! is a list of per-field messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    /// Carries the internal detail for server-side logging; callers only ever
    /// see the generic message.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("io error: {err}"))
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: ErrorMessage,
    error: &'static str,
    timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label, message) = match self {
            ApiError::Validation(messages) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                ErrorMessage::Many(messages),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                ErrorMessage::Single(msg),
            ),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                ErrorMessage::Single(msg),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                ErrorMessage::Single(msg),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    ErrorMessage::Single("Internal server error".into()),
                )
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: label,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        (status, Json(body)).into_response()
    }
}
