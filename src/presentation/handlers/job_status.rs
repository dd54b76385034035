use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error::{error_response, job_service_error_response};
use super::job_view::JobResponse;

/// Returns the stored snapshot without contacting the provider.
#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let id: JobId = match job_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid job ID: {}", job_id),
            );
        }
    };

    match state.job_service.get(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Err(e) => job_service_error_response(&e),
    }
}
