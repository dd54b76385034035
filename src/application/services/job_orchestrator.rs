use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;

use crate::application::ports::{
    ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus, StagingStore,
    StagingStoreError,
};
use crate::domain::{
    Job, JobId, JobParameters, JobTransitionError, StoragePath, resolve_result_location,
};

const DEFAULT_PROVIDER_ERROR: &str = "The compute provider reported an internal error";
const EMPTY_RESULTS_ERROR: &str = "The compute provider completed without returning any results";

/// Submits jobs to one compute provider and advances them one status check at a time.
///
/// Holds no per-job state: every call takes the current `Job` snapshot and returns
/// the next one, so it can serve short-lived, independent requests.
pub struct JobOrchestrator {
    pipeline: String,
    staging_store: Arc<dyn StagingStore>,
    provider: Arc<dyn ComputeProvider>,
    signed_url_ttl: Duration,
}

impl JobOrchestrator {
    pub fn new(
        pipeline: impl Into<String>,
        staging_store: Arc<dyn StagingStore>,
        provider: Arc<dyn ComputeProvider>,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            pipeline: pipeline.into(),
            staging_store,
            provider,
            signed_url_ttl,
        }
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Signs every input, hands the URLs to the provider and returns a `Submitted` job.
    ///
    /// Nothing is created when any step fails.
    #[tracing::instrument(skip_all, fields(pipeline = %self.pipeline, inputs = input_refs.len()))]
    pub async fn submit(
        &self,
        input_refs: Vec<StoragePath>,
        parameters: JobParameters,
    ) -> Result<Job, SubmissionError> {
        if input_refs.is_empty() {
            return Err(SubmissionError::NoInputs);
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = input_refs.iter().find(|p| !seen.insert(*p)) {
            return Err(SubmissionError::DuplicateInput(duplicate.clone()));
        }

        for path in &input_refs {
            let exists = self
                .staging_store
                .exists(path)
                .await
                .map_err(SubmissionError::Staging)?;
            if !exists {
                tracing::warn!(path = %path, "Input artifact missing from staging store");
                return Err(SubmissionError::InputNotFound(path.clone()));
            }
        }

        let signed_urls = try_join_all(
            input_refs
                .iter()
                .map(|path| self.staging_store.signed_url(path, self.signed_url_ttl)),
        )
        .await
        .map_err(SubmissionError::Staging)?;

        tracing::debug!(
            urls = ?signed_urls,
            ttl_secs = self.signed_url_ttl.as_secs(),
            "Signed input URLs"
        );

        let handle = self
            .provider
            .create_job(&signed_urls, &parameters)
            .await
            .map_err(SubmissionError::Provider)?;

        let mut job = Job::new(self.pipeline.clone(), input_refs, parameters);
        job.mark_submitted(handle)?;

        tracing::info!(
            job_id = %job.id(),
            remote_handle = %job.remote_handle().map(|h| h.as_str()).unwrap_or_default(),
            "Job submitted to compute provider"
        );

        Ok(job)
    }

    /// Issues a single status request and returns the job's next snapshot.
    ///
    /// Terminal jobs come back unchanged without contacting the provider. The
    /// transition into a terminal state schedules cleanup of the staged inputs.
    #[tracing::instrument(skip_all, fields(pipeline = %self.pipeline, job_id = %job.id(), state = %job.state()))]
    pub async fn poll(&self, job: &Job) -> Result<Job, PollError> {
        if job.is_terminal() {
            tracing::debug!("Job already terminal, skipping provider");
            return Ok(job.clone());
        }

        let handle = job
            .remote_handle()
            .ok_or_else(|| PollError::NotSubmitted(job.id()))?;

        let status = match self.provider.job_status(handle).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Status check failed, job left unchanged");
                return Err(PollError::Transient(e));
            }
        };

        let mut next = job.clone();
        self.apply_status(&mut next, status)?;

        if next.state() != job.state() {
            tracing::info!(from = %job.state(), to = %next.state(), "Job state transition");
        }

        if next.is_terminal() {
            self.schedule_cleanup(&next);
        }

        Ok(next)
    }

    fn apply_status(
        &self,
        job: &mut Job,
        status: ProviderStatus,
    ) -> Result<(), JobTransitionError> {
        match status {
            ProviderStatus::Running => job.mark_running(),
            ProviderStatus::Complete(results) => {
                job.mark_running()?;
                if results.is_empty() {
                    return job.fail(EMPTY_RESULTS_ERROR);
                }
                match self.resolve_results(results) {
                    Ok(resolved) => job.complete(resolved),
                    Err(message) => job.fail(message),
                }
            }
            ProviderStatus::Error(message) => {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PROVIDER_ERROR.to_string());
                job.fail(message)
            }
        }
    }

    fn resolve_results(
        &self,
        results: Vec<ProviderResult>,
    ) -> Result<BTreeMap<String, reqwest::Url>, String> {
        let base = self.provider.base_url();
        results
            .into_iter()
            .map(|result| {
                resolve_result_location(base, &result.location)
                    .map(|url| (result.name, url))
                    .map_err(|e| format!("The compute provider returned an unusable result: {}", e))
            })
            .collect()
    }

    fn schedule_cleanup(&self, job: &Job) {
        let store = Arc::clone(&self.staging_store);
        let paths = job.input_refs().to_vec();
        let job_id = job.id();
        let state = job.state();

        tokio::spawn(async move {
            match store.delete(&paths).await {
                Ok(()) => tracing::debug!(
                    job_id = %job_id,
                    state = %state,
                    count = paths.len(),
                    "Staged inputs removed"
                ),
                Err(e) => tracing::warn!(
                    job_id = %job_id,
                    error = %e,
                    "Failed to remove staged inputs after terminal state"
                ),
            }
        });
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("at least one input reference is required")]
    NoInputs,
    #[error("input listed more than once: {0}")]
    DuplicateInput(StoragePath),
    #[error("input not found in staging store: {0}")]
    InputNotFound(StoragePath),
    #[error("staging store: {0}")]
    Staging(StagingStoreError),
    #[error("compute provider: {0}")]
    Provider(ComputeProviderError),
    #[error("job state: {0}")]
    Transition(#[from] JobTransitionError),
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The status request failed; the job itself may be fine. Retry after the usual delay.
    #[error("transient poll failure: {0}")]
    Transient(ComputeProviderError),
    #[error("job {0} has no remote handle")]
    NotSubmitted(JobId),
    #[error("job state: {0}")]
    Transition(#[from] JobTransitionError),
}

impl PollError {
    pub fn is_transient(&self) -> bool {
        matches!(self, PollError::Transient(_))
    }
}
