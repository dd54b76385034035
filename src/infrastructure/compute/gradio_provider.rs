use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{
    ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus,
};
use crate::domain::{JobParameters, RemoteHandle, SignedUrl};
use crate::infrastructure::observability::sanitize_body;
use crate::presentation::config::{GradioArgument, ParamKind};

use super::event_stream::{EventStreamStatus, parse_event_stream};

/// Gradio "call" API: `POST /gradio_api/call/{endpoint}` starts an event,
/// `GET /gradio_api/call/{endpoint}/{event_id}` streams its progress.
pub struct GradioComputeProvider {
    client: Client,
    base_url: Url,
    endpoint: String,
    api_token: Option<String>,
    arguments: Vec<GradioArgument>,
    result_names: Vec<String>,
}

#[derive(Serialize)]
struct CallRequest {
    data: Vec<Value>,
}

#[derive(Deserialize)]
struct CallResponse {
    #[serde(default)]
    event_id: Option<String>,
}

impl GradioComputeProvider {
    pub fn new(
        base_url: Url,
        endpoint: String,
        api_token: Option<String>,
        arguments: Vec<GradioArgument>,
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
            endpoint,
            api_token,
            arguments,
            result_names,
        })
    }

    fn call_url(&self) -> String {
        format!(
            "{}/gradio_api/call/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.endpoint
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Lays out the positional `data` array from the configured argument slots.
    pub fn build_data(
        &self,
        input_urls: &[SignedUrl],
        parameters: &JobParameters,
    ) -> Result<Vec<Value>, ComputeProviderError> {
        self.arguments
            .iter()
            .map(|argument| match argument {
                GradioArgument::Input { input } => input_urls
                    .get(*input)
                    .map(|url| Value::String(url.expose().to_string()))
                    .ok_or_else(|| {
                        ComputeProviderError::InvalidParameters(format!(
                            "argument expects input #{} but only {} were given",
                            input,
                            input_urls.len()
                        ))
                    }),
                GradioArgument::Param {
                    param,
                    default,
                    kind,
                } => {
                    let value = parameters
                        .get(param)
                        .filter(|v| !v.is_null())
                        .or(default.as_ref())
                        .cloned()
                        .unwrap_or(Value::Null);
                    match kind {
                        Some(kind) => coerce(param, value, *kind, default.as_ref()),
                        None => Ok(value),
                    }
                }
                GradioArgument::Literal { value } => Ok(value.clone()),
            })
            .collect()
    }

    fn map_results(&self, items: Vec<Value>) -> Vec<ProviderResult> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let location = result_location(&item)?;
                let name = self
                    .result_names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("output_{}", index));
                Some(ProviderResult::new(name, location))
            })
            .collect()
    }
}

/// Converts a parameter the way the form fields arrive: numbers may come in as strings.
/// Values that do not convert fall back to the slot default.
fn coerce(
    param: &str,
    value: Value,
    kind: ParamKind,
    default: Option<&Value>,
) -> Result<Value, ComputeProviderError> {
    let converted = match (kind, &value) {
        (ParamKind::Integer, Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Value::from),
        (ParamKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| Value::from(f.trunc() as i64)),
        (ParamKind::Float, Value::Number(n)) => n.as_f64().map(Value::from),
        // "NaN" and "inf" parse, but serialize as null.
        (ParamKind::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from),
        (ParamKind::String, Value::String(_)) => Some(value.clone()),
        (ParamKind::String, Value::Number(_) | Value::Bool(_)) => {
            Some(Value::String(value.to_string()))
        }
        _ => None,
    };

    match (converted, default) {
        (Some(v), _) => Ok(v),
        (None, Some(fallback)) => Ok(fallback.clone()),
        (None, None) => Err(ComputeProviderError::InvalidParameters(format!(
            "parameter {} cannot be read as {:?}: {}",
            param, kind, value
        ))),
    }
}

/// Gradio returns files either as bare server paths or as file objects.
/// Bare relative paths are served from the `file=` route.
fn result_location(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(file_route(s)),
        Value::Object(map) => {
            if let Some(url) = map.get("url").and_then(Value::as_str) {
                return Some(url.to_string());
            }
            map.get("path").and_then(Value::as_str).map(file_route)
        }
        _ => None,
    }
}

fn file_route(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("file=") {
        path.to_string()
    } else {
        format!("file={}", path)
    }
}

#[async_trait]
impl ComputeProvider for GradioComputeProvider {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, inputs = input_urls.len()))]
    async fn create_job(
        &self,
        input_urls: &[SignedUrl],
        parameters: &JobParameters,
    ) -> Result<RemoteHandle, ComputeProviderError> {
        let data = self.build_data(input_urls, parameters)?;

        let response = self
            .apply_auth(self.client.post(self.call_url()))
            .json(&CallRequest { data })
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

        let payload: CallResponse = response
            .json()
            .await
            .map_err(|e| ComputeProviderError::MalformedResponse(e.to_string()))?;

        let handle = payload
            .event_id
            .and_then(RemoteHandle::new)
            .ok_or(ComputeProviderError::MissingHandle)?;

        tracing::debug!(event_id = %handle, "Gradio event started");
        Ok(handle)
    }

    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, event_id = %handle))]
    async fn job_status(
        &self,
        handle: &RemoteHandle,
    ) -> Result<ProviderStatus, ComputeProviderError> {
        let url = format!("{}/{}", self.call_url(), handle.as_str());

        let response = self
            .apply_auth(self.client.get(url))
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

        let body = response
            .text()
            .await
            .map_err(|e| ComputeProviderError::RequestFailed(e.to_string()))?;

        match parse_event_stream(&body) {
            EventStreamStatus::Running => Ok(ProviderStatus::Running),
            EventStreamStatus::Complete(items) => {
                Ok(ProviderStatus::Complete(self.map_results(items)))
            }
            EventStreamStatus::Error(message) => Ok(ProviderStatus::Error(message)),
            EventStreamStatus::Unparseable(reason) => {
                Err(ComputeProviderError::UnparseablePayload(reason))
            }
        }
    }
}
