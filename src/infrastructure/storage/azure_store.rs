use std::time::Duration;

use object_store::ObjectStore;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use reqwest::Method;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::{SignedUrl, StoragePath};

/// Azure Blob container holding staged inputs. Read URLs are account-key SAS URLs.
pub struct AzureStagingStore {
    inner: MicrosoftAzure,
}

impl AzureStagingStore {
    pub fn new(
        account: &str,
        access_key: &str,
        container: &str,
    ) -> Result<Self, StagingStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| StagingStoreError::Configuration(e.to_string()))?;

        Ok(Self { inner: store })
    }
}

#[async_trait::async_trait]
impl StagingStore for AzureStagingStore {
    async fn signed_url(
        &self,
        path: &StoragePath,
        ttl: Duration,
    ) -> Result<SignedUrl, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let url = self
            .inner
            .signed_url(Method::GET, &store_path, ttl)
            .await
            .map_err(|e| StagingStoreError::SigningFailed(e.to_string()))?;
        Ok(SignedUrl::new(url))
    }

    async fn exists(&self, path: &StoragePath) -> Result<bool, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        match self.inner.head(&store_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StagingStoreError::RequestFailed(e.to_string())),
        }
    }

    async fn delete(&self, paths: &[StoragePath]) -> Result<(), StagingStoreError> {
        for path in paths {
            let store_path = StorePath::from(path.as_str());
            match self.inner.delete(&store_path).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(StagingStoreError::DeleteFailed(e.to_string())),
            }
        }
        Ok(())
    }
}
