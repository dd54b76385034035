use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobParameters, StoragePath};

use super::polling::{PollFailure, PollingPolicy, WaitError, poll_until_terminal};
use super::{JobOrchestrator, PollError, SubmissionError};

/// Caller-facing entry point: routes requests to the pipeline's orchestrator and
/// keeps the latest snapshot of every job so callers only need the job id.
///
/// Status checks for one job are serialized, so concurrent `check` calls never
/// reach the provider twice for the same transition.
pub struct JobService {
    orchestrators: HashMap<String, Arc<JobOrchestrator>>,
    job_repository: Arc<dyn JobRepository>,
    polling_policy: PollingPolicy,
    check_locks: Mutex<HashMap<JobId, Arc<Mutex<()>>>>,
}

impl JobService {
    pub fn new(job_repository: Arc<dyn JobRepository>) -> Self {
        Self {
            orchestrators: HashMap::new(),
            job_repository,
            polling_policy: PollingPolicy::default(),
            check_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_polling_policy(mut self, policy: PollingPolicy) -> Self {
        self.polling_policy = policy;
        self
    }

    pub fn polling_policy(&self) -> &PollingPolicy {
        &self.polling_policy
    }

    pub fn with_pipeline(mut self, orchestrator: JobOrchestrator) -> Self {
        self.orchestrators
            .insert(orchestrator.pipeline().to_string(), Arc::new(orchestrator));
        self
    }

    pub fn pipelines(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.orchestrators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[tracing::instrument(skip(self, input_refs, parameters), fields(inputs = input_refs.len()))]
    pub async fn submit(
        &self,
        pipeline: &str,
        input_refs: Vec<StoragePath>,
        parameters: JobParameters,
    ) -> Result<Job, JobServiceError> {
        let orchestrator = self.orchestrator(pipeline)?;

        for path in &input_refs {
            if let Some(owner) = self.job_repository.find_active_owner(path).await? {
                return Err(JobServiceError::InputInUse {
                    path: path.clone(),
                    owner,
                });
            }
        }

        let job = orchestrator.submit(input_refs, parameters).await?;

        if let Err(e) = self.job_repository.create(&job).await {
            tracing::error!(
                job_id = %job.id(),
                error = %e,
                "Failed to record submitted job; remote job is orphaned"
            );
            return Err(e.into());
        }

        Ok(job)
    }

    /// Advances the job by one status check and stores the result.
    #[tracing::instrument(skip_all, fields(job_id = %job_id))]
    pub async fn check(&self, job_id: JobId) -> Result<Job, JobServiceError> {
        let job = self.get(job_id).await?;
        if job.is_terminal() {
            return Ok(job);
        }

        let lock = {
            let mut locks = self.check_locks.lock().await;
            Arc::clone(locks.entry(job_id).or_default())
        };
        let _guard = lock.lock().await;

        // Another check may have advanced the job while this one waited.
        let job = self.get(job_id).await?;
        if job.is_terminal() {
            self.check_locks.lock().await.remove(&job_id);
            return Ok(job);
        }

        let orchestrator = self.orchestrator(job.pipeline())?;
        let next = orchestrator.poll(&job).await?;

        if next != job {
            self.job_repository.update(&next).await?;
        }
        if next.is_terminal() {
            self.check_locks.lock().await.remove(&job_id);
        }

        Ok(next)
    }

    pub async fn get(&self, job_id: JobId) -> Result<Job, JobServiceError> {
        self.job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(JobServiceError::NotFound(job_id))
    }

    /// Runs the caller-side polling loop with the configured policy.
    pub async fn wait(&self, job_id: JobId) -> Result<Job, WaitError<JobServiceError>> {
        let job = self.get(job_id).await.map_err(WaitError::Poll)?;
        let service = self;
        poll_until_terminal(job, &self.polling_policy, move |job| async move {
            service.check(job.id()).await
        })
        .await
    }

    fn orchestrator(&self, pipeline: &str) -> Result<&Arc<JobOrchestrator>, JobServiceError> {
        self.orchestrators
            .get(pipeline)
            .ok_or_else(|| JobServiceError::UnknownPipeline(pipeline.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("unknown pipeline: {0}")]
    UnknownPipeline(String),
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("input {path} is still in use by job {owner}")]
    InputInUse { path: StoragePath, owner: JobId },
    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("poll failed: {0}")]
    Poll(#[from] PollError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl PollFailure for JobServiceError {
    fn is_transient(&self) -> bool {
        matches!(self, JobServiceError::Poll(e) if e.is_transient())
    }
}
