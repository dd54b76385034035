use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::{SignedUrl, StoragePath};
use crate::infrastructure::observability::sanitize_body;

/// Supabase Storage bucket accessed through its REST API with the service key.
pub struct SupabaseStagingStore {
    client: Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    prefixes: Vec<&'a str>,
}

impl SupabaseStagingStore {
    pub fn new(
        base_url: &str,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StagingStoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StagingStoreError::Configuration(format!("supabase_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StagingStoreError::Configuration(format!(
                "supabase_url is not a base URL: {}",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StagingStoreError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            service_key: service_key.into(),
            bucket: bucket.into(),
        })
    }

    /// `{base}/storage/v1/{route...}/{bucket}/{path...}` with every segment percent-encoded.
    fn object_url(&self, route: &[&str], path: Option<&StoragePath>) -> Result<Url, StagingStoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StagingStoreError::Configuration("supabase_url is not a base URL".to_string())
            })?;
            segments.pop_if_empty();
            segments.extend(["storage", "v1"]);
            segments.extend(route);
            segments.push(&self.bucket);
            if let Some(path) = path {
                segments.extend(path.segments());
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Sign responses are relative to `{base}/storage/v1`.
    fn absolute_signed_url(&self, signed: &str) -> Result<Url, StagingStoreError> {
        if let Ok(url) = Url::parse(signed) {
            return Ok(url);
        }
        let base = format!(
            "{}/storage/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            signed.trim_start_matches('/')
        );
        Url::parse(&base).map_err(|e| StagingStoreError::SigningFailed(e.to_string()))
    }
}

fn is_missing_object(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let lower = body.to_ascii_lowercase();
    status == StatusCode::BAD_REQUEST && (lower.contains("not_found") || lower.contains("not found"))
}

#[async_trait::async_trait]
impl StagingStore for SupabaseStagingStore {
    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn signed_url(
        &self,
        path: &StoragePath,
        ttl: Duration,
    ) -> Result<SignedUrl, StagingStoreError> {
        let url = self.object_url(&["object", "sign"], Some(path))?;

        let response = self
            .authorize(self.client.post(url))
            .json(&SignRequest {
                expires_in: ttl.as_secs(),
            })
            .send()
            .await
            .map_err(|e| StagingStoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_missing_object(status, &body) {
                return Err(StagingStoreError::NotFound(path.to_string()));
            }
            return Err(StagingStoreError::SigningFailed(format!(
                "status {}: {}",
                status.as_u16(),
                sanitize_body(&body)
            )));
        }

        let payload: SignResponse = response
            .json()
            .await
            .map_err(|e| StagingStoreError::SigningFailed(e.to_string()))?;

        self.absolute_signed_url(&payload.signed_url).map(SignedUrl::new)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn exists(&self, path: &StoragePath) -> Result<bool, StagingStoreError> {
        let url = self.object_url(&["object", "authenticated"], Some(path))?;

        let response = self
            .authorize(self.client.head(url))
            .send()
            .await
            .map_err(|e| StagingStoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        // HEAD responses carry no body, so a 400 here is Supabase's "object not found".
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Ok(false);
        }
        Err(StagingStoreError::RequestFailed(format!(
            "existence check returned status {}",
            status.as_u16()
        )))
    }

    #[tracing::instrument(skip(self, paths), fields(bucket = %self.bucket, count = paths.len()))]
    async fn delete(&self, paths: &[StoragePath]) -> Result<(), StagingStoreError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.object_url(&["object"], None)?;

        let response = self
            .authorize(self.client.delete(url))
            .json(&DeleteRequest {
                prefixes: paths.iter().map(StoragePath::as_str).collect(),
            })
            .send()
            .await
            .map_err(|e| StagingStoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StagingStoreError::DeleteFailed(format!(
                "status {}: {}",
                status.as_u16(),
                sanitize_body(&body)
            )));
        }

        Ok(())
    }
}
