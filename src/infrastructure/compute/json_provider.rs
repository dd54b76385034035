use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ports::{
    ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus,
};
use crate::domain::{JobParameters, RemoteHandle, SignedUrl};
use crate::infrastructure::observability::sanitize_body;

/// Plain JSON job API used by the sample generator:
/// `POST {base}/jobs` creates a job, `GET {base}/jobs/{id}` reports on it.
pub struct JsonComputeProvider {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    result_names: Vec<String>,
}

#[derive(Serialize)]
struct CreateJobRequest<'a> {
    input_urls: Vec<&'a str>,
    parameters: &'a JobParameters,
}

#[derive(Deserialize)]
struct CreateJobResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    event_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    status: String,
    #[serde(default)]
    results: Option<Value>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl JsonComputeProvider {
    pub fn new(
        base_url: Url,
        api_token: Option<String>,
        result_names: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, ComputeProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ComputeProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_token,
            result_names,
        })
    }

    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url.as_str().trim_end_matches('/'))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ComputeProviderError> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| ComputeProviderError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ComputeProviderError::HttpStatus {
                status,
                body: sanitize_body(&body),
            });
        }

        Ok(response)
    }

    fn interpret(&self, payload: JobStatusResponse) -> Result<ProviderStatus, ComputeProviderError> {
        match payload.status.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" | "running" | "processing" => Ok(ProviderStatus::Running),
            "complete" | "completed" | "succeeded" => {
                Ok(ProviderStatus::Complete(self.collect_results(&payload)))
            }
            "error" | "failed" => Ok(ProviderStatus::Error(payload.error_message)),
            other => Err(ComputeProviderError::UnparseablePayload(format!(
                "unknown job status: {}",
                other
            ))),
        }
    }

    fn collect_results(&self, payload: &JobStatusResponse) -> Vec<ProviderResult> {
        let mut results = match &payload.results {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .as_str()
                        .filter(|s| !s.trim().is_empty())
                        .map(|location| ProviderResult::new(name.clone(), location))
                })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let location = value.as_str().filter(|s| !s.trim().is_empty())?;
                    let name = self
                        .result_names
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| format!("output_{}", index));
                    Some(ProviderResult::new(name, location))
                })
                .collect(),
            _ => Vec::new(),
        };

        for (key, value) in &payload.extra {
            let Some(name) = key.strip_suffix("_url") else {
                continue;
            };
            let Some(location) = value.as_str().filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            if name.is_empty() || results.iter().any(|r: &ProviderResult| r.name == name) {
                continue;
            }
            results.push(ProviderResult::new(name, location));
        }

        results
    }
}

fn handle_from(value: Option<Value>) -> Option<RemoteHandle> {
    match value? {
        Value::String(s) => RemoteHandle::new(s),
        Value::Number(n) => RemoteHandle::new(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ComputeProvider for JsonComputeProvider {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[tracing::instrument(skip_all, fields(base_url = %self.base_url, inputs = input_urls.len()))]
    async fn create_job(
        &self,
        input_urls: &[SignedUrl],
        parameters: &JobParameters,
    ) -> Result<RemoteHandle, ComputeProviderError> {
        let body = CreateJobRequest {
            input_urls: input_urls.iter().map(SignedUrl::expose).collect(),
            parameters,
        };

        let response = self.send(self.client.post(self.jobs_url()).json(&body)).await?;

        let payload: CreateJobResponse = response
            .json()
            .await
            .map_err(|e| ComputeProviderError::MalformedResponse(e.to_string()))?;

        let handle = handle_from(payload.id)
            .or_else(|| handle_from(payload.event_id))
            .ok_or(ComputeProviderError::MissingHandle)?;

        tracing::debug!(remote_id = %handle, "Remote job created");
        Ok(handle)
    }

    #[tracing::instrument(skip_all, fields(base_url = %self.base_url, remote_id = %handle))]
    async fn job_status(
        &self,
        handle: &RemoteHandle,
    ) -> Result<ProviderStatus, ComputeProviderError> {
        let url = format!("{}/{}", self.jobs_url(), handle.as_str());
        let response = self.send(self.client.get(url)).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ComputeProviderError::RequestFailed(e.to_string()))?;

        let payload: JobStatusResponse = serde_json::from_str(&body)
            .map_err(|e| ComputeProviderError::UnparseablePayload(e.to_string()))?;

        self.interpret(payload)
    }
}
