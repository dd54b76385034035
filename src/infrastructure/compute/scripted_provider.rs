use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;

use crate::application::ports::{
    ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus,
};
use crate::domain::{JobParameters, RemoteHandle, SignedUrl};

/// In-process provider that answers `running` for a fixed number of status checks
/// and then completes with one relative result per configured name.
///
/// A handle is forgotten once it completes; later checks answer 404 like an expired remote job.
pub struct ScriptedComputeProvider {
    base_url: Url,
    polls_until_complete: u32,
    result_names: Vec<String>,
    polls: Mutex<HashMap<String, u32>>,
}

impl ScriptedComputeProvider {
    pub fn new(base_url: Url, polls_until_complete: u32, result_names: Vec<String>) -> Self {
        let result_names = if result_names.is_empty() {
            vec!["output".to_string()]
        } else {
            result_names
        };

        Self {
            base_url,
            polls_until_complete,
            result_names,
            polls: Mutex::new(HashMap::new()),
        }
    }

    fn next_poll(&self, handle: &RemoteHandle) -> Result<Option<u32>, ComputeProviderError> {
        let mut polls = self
            .polls
            .lock()
            .map_err(|_| ComputeProviderError::RequestFailed("poll counter poisoned".into()))?;
        Ok(polls.get_mut(handle.as_str()).map(|count| {
            *count += 1;
            *count
        }))
    }
}

#[async_trait]
impl ComputeProvider for ScriptedComputeProvider {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn create_job(
        &self,
        input_urls: &[SignedUrl],
        _parameters: &JobParameters,
    ) -> Result<RemoteHandle, ComputeProviderError> {
        if input_urls.is_empty() {
            return Err(ComputeProviderError::InvalidParameters(
                "no input urls".to_string(),
            ));
        }

        let id = format!("scripted-{}", uuid::Uuid::new_v4());
        let handle = RemoteHandle::new(id).ok_or(ComputeProviderError::MissingHandle)?;

        self.polls
            .lock()
            .map_err(|_| ComputeProviderError::RequestFailed("poll counter poisoned".into()))?
            .insert(handle.as_str().to_string(), 0);

        Ok(handle)
    }

    async fn job_status(
        &self,
        handle: &RemoteHandle,
    ) -> Result<ProviderStatus, ComputeProviderError> {
        let Some(count) = self.next_poll(handle)? else {
            return Err(ComputeProviderError::HttpStatus {
                status: 404,
                body: format!("unknown job {}", handle),
            });
        };

        if count <= self.polls_until_complete {
            return Ok(ProviderStatus::Running);
        }

        self.polls
            .lock()
            .map_err(|_| ComputeProviderError::RequestFailed("poll counter poisoned".into()))?
            .remove(handle.as_str());

        let results = self
            .result_names
            .iter()
            .map(|name| ProviderResult::new(name.clone(), format!("outputs/{}/{}", handle, name)))
            .collect();

        Ok(ProviderStatus::Complete(results))
    }
}
