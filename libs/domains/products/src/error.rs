use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to decode {entity}: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },

    #[error("Invalid aggregation pipeline: {0}")]
    InvalidPipeline(#[from] PipelineError),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Every product failure is a server-side problem; details stay in the logs
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Database(msg) => AppError::Database(msg),
            err @ ProductError::Decode { .. } => AppError::Decode(err.to_string()),
            ProductError::InvalidPipeline(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
