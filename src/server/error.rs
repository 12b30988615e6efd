//! API errors and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::admin::AdminError;
use crate::assemble::AssembleError;

/// Error body: `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing required field `{}`", field))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AdminError::Store(_) => ApiError::Internal(err.to_string()),
            AdminError::Validation(_)
            | AdminError::DuplicateSlug(_)
            | AdminError::UnknownResource(_)
            | AdminError::InvalidPath { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<AssembleError> for ApiError {
    fn from(err: AssembleError) -> Self {
        match err {
            AssembleError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AssembleError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}
