use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error::{error_response, job_service_error_response};
use super::job_view::JobResponse;

#[derive(Deserialize)]
pub struct CheckRequest {
    pub job_id: String,
}

/// Advances a job by one provider status check.
#[tracing::instrument(skip(state, payload))]
pub async fn check_handler(
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

    match state.job_service.check(job_id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Err(e) => job_service_error_response(&e),
    }
}
