pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body returned to clients.
///
/// Only the HTTP status text is exposed; the underlying cause is logged
/// server side together with an [`ErrorCode`].
///
/// # JSON Example
///
/// ```json
/// { "error": "Internal Server Error" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status text
    pub error: String,
}

impl ErrorResponse {
    pub fn for_status(status: StatusCode) -> Self {
        Self {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_)
            | Self::Decode(_)
            | Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Decode(_) => ErrorCode::DatabaseDecode,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InternalServerError(_) => ErrorCode::InternalError,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        match self {
            AppError::NotFound(path) => {
                tracing::debug!(error_code = code.code(), path = %path, "No route matched");
            }
            AppError::ServiceUnavailable(ref msg) => {
                tracing::warn!(error_code = code.code(), "{}: {}", code.default_message(), msg);
            }
            ref other => {
                tracing::error!(error_code = code.code(), "{}: {}", code.default_message(), other);
            }
        }

        error_response(status)
    }
}

/// Build a bare error response carrying only the status text.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::error_response;
/// use axum::http::StatusCode;
///
/// let response = error_response(StatusCode::SERVICE_UNAVAILABLE);
/// ```
pub fn error_response(status: StatusCode) -> Response {
    (status, Json(ErrorResponse::for_status(status))).into_response()
}
