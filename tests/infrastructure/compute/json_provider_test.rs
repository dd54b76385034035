use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use stemforge::application::ports::{
    ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus,
};
use stemforge::domain::{JobParameters, RemoteHandle, SignedUrl};
use stemforge::infrastructure::compute::JsonComputeProvider;

#[derive(Clone)]
struct MockJobsApi {
    create_body: Value,
    status_status: u16,
    status_body: &'static str,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn start_mock_jobs_api(mock: MockJobsApi) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route(
            "/api/jobs",
            post(
                |State(mock): State<MockJobsApi>, Json(body): Json<Value>| async move {
                    mock.received.lock().unwrap().push(body);
                    (StatusCode::CREATED, Json(mock.create_body.clone()))
                },
            ),
        )
        .route(
            "/api/jobs/{id}",
            get(
                |State(mock): State<MockJobsApi>, Path(_id): Path<String>| async move {
                    let status = StatusCode::from_u16(mock.status_status).unwrap();
                    (status, mock.status_body).into_response()
                },
            ),
        )
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/api", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn mock(create_body: Value, status_status: u16, status_body: &'static str) -> MockJobsApi {
    MockJobsApi {
        create_body,
        status_status,
        status_body,
        received: Arc::new(Mutex::new(Vec::new())),
    }
}

fn provider(base_url: &str) -> JsonComputeProvider {
    JsonComputeProvider::new(
        Url::parse(base_url).unwrap(),
        None,
        vec!["audio".to_string(), "midi".to_string()],
        Duration::from_secs(5),
    )
    .unwrap()
}

async fn status_for(body: &'static str) -> Result<ProviderStatus, ComputeProviderError> {
    let (base_url, shutdown_tx) = start_mock_jobs_api(mock(json!({}), 200, body)).await;
    let result = provider(&base_url)
        .job_status(&RemoteHandle::new("job-7").unwrap())
        .await;
    shutdown_tx.send(()).ok();
    result
}

#[tokio::test]
async fn given_job_created_when_submitting_then_urls_and_parameters_posted() {
    let server = mock(json!({"id": "job-7"}), 200, "");
    let received = server.received.clone();
    let (base_url, shutdown_tx) = start_mock_jobs_api(server).await;
    let url = SignedUrl::new(Url::parse("https://staging.test/in/a.wav?token=t").unwrap());

    let handle = provider(&base_url)
        .create_job(&[url], &JobParameters::new().with("genre", "lofi"))
        .await
        .unwrap();

    assert_eq!(handle.as_str(), "job-7");
    assert_eq!(
        received.lock().unwrap()[0],
        json!({
            "input_urls": ["https://staging.test/in/a.wav?token=t"],
            "parameters": {"genre": "lofi"}
        })
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_numeric_event_id_when_submitting_then_used_as_handle() {
    let (base_url, shutdown_tx) = start_mock_jobs_api(mock(json!({"event_id": 991}), 200, "")).await;
    let url = SignedUrl::new(Url::parse("https://staging.test/in/a.wav").unwrap());

    let handle = provider(&base_url)
        .create_job(&[url], &JobParameters::new())
        .await
        .unwrap();

    assert_eq!(handle.as_str(), "991");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_processing_status_when_checking_then_running() {
    assert_eq!(
        status_for(r#"{"status": "processing"}"#).await.unwrap(),
        ProviderStatus::Running
    );
}

#[tokio::test]
async fn given_complete_with_named_results_when_checking_then_names_kept() {
    let status = status_for(
        r#"{"status": "complete", "results": {"audio": "outputs/7/song.wav", "midi": "outputs/7/song.mid"}}"#,
    )
    .await
    .unwrap();

    assert_eq!(
        status,
        ProviderStatus::Complete(vec![
            ProviderResult::new("audio", "outputs/7/song.wav"),
            ProviderResult::new("midi", "outputs/7/song.mid"),
        ])
    );
}

#[tokio::test]
async fn given_complete_with_flat_url_fields_when_checking_then_results_collected() {
    let status = status_for(
        r#"{"status": "complete", "audio_url": "https://cdn.test/a.wav", "midi_url": "https://cdn.test/a.mid"}"#,
    )
    .await
    .unwrap();

    match status {
        ProviderStatus::Complete(results) => {
            let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
            assert!(names.contains(&"audio"));
            assert!(names.contains(&"midi"));
        }
        other => panic!("unexpected status: {:?}", other),
    }
}

#[tokio::test]
async fn given_error_status_when_checking_then_message_forwarded() {
    assert_eq!(
        status_for(r#"{"status": "error", "error_message": "tempo out of range"}"#)
            .await
            .unwrap(),
        ProviderStatus::Error(Some("tempo out of range".to_string()))
    );
}

#[tokio::test]
async fn given_unknown_status_when_checking_then_unparseable() {
    assert!(matches!(
        status_for(r#"{"status": "paused"}"#).await,
        Err(ComputeProviderError::UnparseablePayload(_))
    ));
}

#[tokio::test]
async fn given_non_json_body_when_checking_then_unparseable() {
    assert!(matches!(
        status_for("Service Unavailable").await,
        Err(ComputeProviderError::UnparseablePayload(_))
    ));
}

#[tokio::test]
async fn given_status_endpoint_returns_503_when_checking_then_http_status_error() {
    let (base_url, shutdown_tx) =
        start_mock_jobs_api(mock(json!({}), 503, "overloaded")).await;

    let result = provider(&base_url)
        .job_status(&RemoteHandle::new("job-7").unwrap())
        .await;

    assert!(matches!(
        result,
        Err(ComputeProviderError::HttpStatus { status: 503, .. })
    ));
    shutdown_tx.send(()).ok();
}
