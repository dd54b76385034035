use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::{JobParameters, StoragePath};
use crate::presentation::state::AppState;

use super::error::{error_response, job_service_error_response};

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub pipeline: String,
    pub input_refs: Vec<String>,
    #[serde(default)]
    pub parameters: JobParameters,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected submit body");
            return error_response(StatusCode::BAD_REQUEST, e.body_text());
        }
    };

    let pipeline = request.pipeline.trim();
    if pipeline.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "pipeline is required");
    }

    let input_refs = match request
        .input_refs
        .into_iter()
        .map(StoragePath::parse)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(refs) => refs,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("invalid input ref: {}", e));
        }
    };

    match state
        .job_service
        .submit(pipeline, input_refs, request.parameters)
        .await
    {
        Ok(job) => {
            tracing::info!(job_id = %job.id(), pipeline, "Job accepted");
            (
                StatusCode::ACCEPTED,
                Json(SubmitResponse {
                    job_id: job.id().to_string(),
                    status: job.state().as_str().to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => job_service_error_response(&e),
    }
}
