use std::sync::Arc;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::azure_store::AzureStagingStore;
use super::memory_store::InMemoryStagingStore;
use super::supabase_store::SupabaseStagingStore;

pub struct StagingStoreFactory;

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, StagingStoreError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StagingStoreError::Configuration(format!("{} required", name)))
}

impl StagingStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn StagingStore>, StagingStoreError> {
        match settings.provider {
            StorageProviderSetting::Azure => {
                let account = required(&settings.azure_account, "azure_account")?;
                let key = required(&settings.azure_access_key, "azure_access_key")?;
                let container = required(&settings.azure_container, "azure_container")?;
                tracing::info!(account, container, "Using Azure staging store");
                let store = AzureStagingStore::new(account, key, container)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Supabase => {
                let url = required(&settings.supabase_url, "supabase_url")?;
                let key = required(&settings.supabase_service_key, "supabase_service_key")?;
                let bucket = required(&settings.supabase_bucket, "supabase_bucket")?;
                tracing::info!(url, bucket, "Using Supabase staging store");
                let store = SupabaseStagingStore::new(
                    url,
                    key,
                    bucket,
                    std::time::Duration::from_secs(settings.request_timeout_secs),
                )?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => {
                tracing::warn!("Using in-memory staging store; staged inputs are lost on restart");
                Ok(Arc::new(InMemoryStagingStore::permissive()))
            }
        }
    }
}
