use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

/// Cadence HTTP callers should use between `check` calls.
#[derive(Serialize)]
pub struct PollingHint {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

#[derive(Serialize)]
pub struct PipelinesResponse {
    pub pipelines: Vec<String>,
    pub polling: PollingHint,
}

pub async fn pipelines_handler(State(state): State<AppState>) -> impl IntoResponse {
    let pipelines = state
        .job_service
        .pipelines()
        .into_iter()
        .map(String::from)
        .collect();
    let policy = state.job_service.polling_policy();

    let body = PipelinesResponse {
        pipelines,
        polling: PollingHint {
            interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
        },
    };

    (StatusCode::OK, Json(body))
}
