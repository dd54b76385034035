use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::WaitError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::check::CheckRequest;
use super::error::{error_response, job_service_error_response};
use super::job_view::JobResponse;

#[derive(Serialize)]
pub struct WaitTimeoutResponse {
    pub error: String,
    pub retryable: bool,
    pub job: JobResponse,
}

/// Polls the job with the configured interval and attempt budget until it is terminal.
///
/// An exhausted budget answers 504 with the last snapshot; the remote job keeps running.
#[tracing::instrument(skip(state, payload))]
pub async fn wait_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
    };

    let job_id: JobId = match request.job_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid job ID: {}", request.job_id),
            );
        }
    };

    let error = match state.job_service.wait(job_id).await {
        Ok(job) => return (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Err(e) => e,
    };

    match &error {
        WaitError::Poll(e) => job_service_error_response(e),
        WaitError::Timeout { job, .. } => {
            tracing::warn!(error = %error, "Wait budget exhausted");
            let body = WaitTimeoutResponse {
                error: error.to_string(),
                retryable: true,
                job: JobResponse::from(job.as_ref()),
            };
            (StatusCode::GATEWAY_TIMEOUT, Json(body)).into_response()
        }
    }
}
