use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use super::AppError;

/// Handler for 404 Not Found errors.
///
/// Used as the router fallback so unknown paths get the same JSON error body
/// as every other failure.
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(uri.path().to_string()).into_response()
}
