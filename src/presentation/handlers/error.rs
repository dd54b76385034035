use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{ComputeProviderError, RepositoryError, StagingStoreError};
use crate::application::services::{JobServiceError, PollError, SubmissionError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            retryable: None,
        }
    }
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error))).into_response()
}

/// Maps a service failure onto the HTTP status the API documents for it.
pub fn job_service_error_response(error: &JobServiceError) -> Response {
    let status = match error {
        JobServiceError::UnknownPipeline(_) | JobServiceError::NotFound(_) => {
            StatusCode::NOT_FOUND
        }
        JobServiceError::InputInUse { .. } => StatusCode::CONFLICT,
        JobServiceError::Submission(e) => submission_status(e),
        JobServiceError::Poll(PollError::Transient(_)) => {
            let body = ErrorResponse {
                error: error.to_string(),
                retryable: Some(true),
            };
            return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
        }
        JobServiceError::Poll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        JobServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        JobServiceError::Repository(RepositoryError::ConstraintViolation(_)) => {
            StatusCode::CONFLICT
        }
    };

    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "Request failed");
    } else {
        tracing::warn!(error = %error, status = status.as_u16(), "Request rejected");
    }

    error_response(status, error.to_string())
}

fn submission_status(error: &SubmissionError) -> StatusCode {
    match error {
        SubmissionError::NoInputs | SubmissionError::DuplicateInput(_) => StatusCode::BAD_REQUEST,
        SubmissionError::InputNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionError::Staging(StagingStoreError::NotFound(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SubmissionError::Staging(_) => StatusCode::BAD_GATEWAY,
        SubmissionError::Provider(ComputeProviderError::InvalidParameters(_)) => {
            StatusCode::BAD_REQUEST
        }
        SubmissionError::Provider(_) => StatusCode::BAD_GATEWAY,
        SubmissionError::Transition(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
