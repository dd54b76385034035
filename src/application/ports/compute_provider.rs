use async_trait::async_trait;
use reqwest::Url;

use crate::domain::{JobParameters, RemoteHandle, SignedUrl};

/// External asynchronous compute service that runs one job per `create_job` call.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Base URL that relative result paths are resolved against.
    fn base_url(&self) -> &Url;

    async fn create_job(
        &self,
        input_urls: &[SignedUrl],
        parameters: &JobParameters,
    ) -> Result<RemoteHandle, ComputeProviderError>;

    async fn job_status(
        &self,
        handle: &RemoteHandle,
    ) -> Result<ProviderStatus, ComputeProviderError>;
}

/// Provider-reported status, already mapped out of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStatus {
    Running,
    Complete(Vec<ProviderResult>),
    Error(Option<String>),
}

/// One named output as the provider returned it, possibly relative to the provider's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub name: String,
    pub location: String,
}

impl ProviderResult {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComputeProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("provider returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("provider response did not include a job handle")]
    MissingHandle,
    #[error("unparseable status payload: {0}")]
    UnparseablePayload(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
