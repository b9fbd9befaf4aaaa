//! HTTP-facing error type.
//!
//! Every handler returns [`Result`]. Client mistakes become 422 with the
//! validation message; store and stored-record failures become 500 with a
//! generic message, and the details go to the log.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sycamore::error::DocumentStoreError;
use thiserror::Error;

use crate::{repository::RepositoryError, schema::ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Payload failed to parse or violated its schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] DocumentStoreError),

    /// A stored record no longer matches its schema.
    #[error("Invalid stored {collection} record: {reason}")]
    InvalidRecord { collection: String, reason: String },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(e) => Self::Validation(e),
            RepositoryError::Store(e) => Self::Store(e),
            RepositoryError::InvalidRecord { collection, reason } => {
                Self::InvalidRecord { collection, reason }
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) | Self::InvalidRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::Store(_) | Self::InvalidRecord { .. } => {
                tracing::error!(error = %self, "Request error");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_unprocessable() {
        let err = AppError::from(RepositoryError::Validation(ValidationError::Negative { field: "price" }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_failures_hide_details() {
        let err = AppError::from(DocumentStoreError::Backend("connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
