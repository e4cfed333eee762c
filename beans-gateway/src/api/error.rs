//! API Error Handling
//!
//! Every failure is answered with the same four-key envelope as a
//! successful run, so callers only ever parse one shape.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use beans_core::dto::run::RunPipelineResponse;

use crate::service::RunError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalError {
        message: String,
        job_name: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, job_name) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None)
            }
            ApiError::InternalError { message, job_name } => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message, job_name)
            }
        };

        let body = RunPipelineResponse::failure(status.as_u16(), message, job_name);
        (status, Json(body)).into_response()
    }
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Validation(e) => ApiError::BadRequest(e.to_string()),
            other => ApiError::InternalError {
                message: other.to_string(),
                job_name: other.job_name().map(str::to_string),
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
