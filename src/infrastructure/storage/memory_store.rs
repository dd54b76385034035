use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use tokio::sync::RwLock;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::{SignedUrl, StoragePath};

const MEMORY_STORE_BASE: &str = "http://staging.local/";

/// Process-local staging store. In permissive mode every path is reported as
/// present, which lets scaffold mode accept arbitrary references.
pub struct InMemoryStagingStore {
    objects: RwLock<HashMap<String, Bytes>>,
    permissive: bool,
}

impl InMemoryStagingStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            permissive: false,
        }
    }

    pub fn permissive() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            permissive: true,
        }
    }

    pub async fn insert(&self, path: &StoragePath, data: impl Into<Bytes>) {
        self.objects
            .write()
            .await
            .insert(path.as_str().to_string(), data.into());
    }

    pub async fn contains(&self, path: &StoragePath) -> bool {
        self.objects.read().await.contains_key(path.as_str())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl Default for InMemoryStagingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StagingStore for InMemoryStagingStore {
    async fn signed_url(
        &self,
        path: &StoragePath,
        ttl: Duration,
    ) -> Result<SignedUrl, StagingStoreError> {
        if !self.exists(path).await? {
            return Err(StagingStoreError::NotFound(path.to_string()));
        }

        let mut url = Url::parse(MEMORY_STORE_BASE)
            .map_err(|e| StagingStoreError::Configuration(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StagingStoreError::SigningFailed("invalid base".to_string()))?
            .pop_if_empty()
            .extend(path.segments());
        url.query_pairs_mut()
            .append_pair("token", &uuid::Uuid::new_v4().to_string())
            .append_pair("expires_in", &ttl.as_secs().to_string());

        Ok(SignedUrl::new(url))
    }

    async fn exists(&self, path: &StoragePath) -> Result<bool, StagingStoreError> {
        Ok(self.permissive || self.contains(path).await)
    }

    async fn delete(&self, paths: &[StoragePath]) -> Result<(), StagingStoreError> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path.as_str());
        }
        Ok(())
    }
}
