use std::time::Duration;

use crate::domain::{SignedUrl, StoragePath};

/// Object store holding the input artifacts a job reads.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Produces a read-only URL valid for `ttl`. Fails with `NotFound` for missing objects.
    async fn signed_url(
        &self,
        path: &StoragePath,
        ttl: Duration,
    ) -> Result<SignedUrl, StagingStoreError>;

    async fn exists(&self, path: &StoragePath) -> Result<bool, StagingStoreError>;

    /// Removes every path in one call. Missing objects are not an error.
    async fn delete(&self, paths: &[StoragePath]) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
