//! Maps internal errors onto the `{error, message}` HTTP shape from §6,
//! with status codes per §7: 400 invalid-path/bad filter, 404 not-found,
//! 409 busy/conflict, 500 internal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPath(String),
    #[error("{0}")]
    NotFound(String),
    #[error("store busy")]
    Busy,
    #[error("report generation failed: {0}")]
    ReportFail(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "invalid_path"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Busy => (StatusCode::CONFLICT, "busy"),
            ApiError::ReportFail(_) => (StatusCode::INTERNAL_SERVER_ERROR, "report_fail"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<redactqc_core::StoreError> for ApiError {
    fn from(e: redactqc_core::StoreError) -> Self {
        match e {
            redactqc_core::StoreError::Busy(_) => ApiError::Busy,
            redactqc_core::StoreError::BatchNotFound(id) => ApiError::NotFound(format!("batch {id}")),
            redactqc_core::StoreError::DocumentNotFound(id) => ApiError::NotFound(format!("document {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<redactqc_batch::BatchError> for ApiError {
    fn from(e: redactqc_batch::BatchError) -> Self {
        match e {
            redactqc_batch::BatchError::InvalidPath(msg) => ApiError::InvalidPath(msg),
            redactqc_batch::BatchError::NotFound(id) => ApiError::NotFound(id),
            redactqc_batch::BatchError::Store(inner) => inner.into(),
            redactqc_batch::BatchError::WorkerSpawn(e) => ApiError::Internal(e.to_string()),
        }
    }
}
