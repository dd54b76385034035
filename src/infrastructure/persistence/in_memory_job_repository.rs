use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, StoragePath};

/// Job snapshots held in process memory. Input ownership is checked under the
/// same write lock as the insert, so two submissions cannot claim one input.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active_owner<'a>(jobs: &'a HashMap<JobId, Job>, path: &StoragePath) -> Option<&'a Job> {
    jobs.values()
        .find(|job| !job.is_terminal() && job.owns_input(path))
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id()))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;

        if jobs.contains_key(&job.id()) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} already exists",
                job.id()
            )));
        }
        for path in job.input_refs() {
            if let Some(owner) = active_owner(&jobs, path) {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "input {} is owned by active job {}",
                    path,
                    owner.id()
                )));
            }
        }

        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    #[instrument(skip(self, job), fields(job_id = %job.id(), state = %job.state()))]
    async fn update(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;

        let stored = jobs
            .get_mut(&job.id())
            .ok_or_else(|| RepositoryError::NotFound(job.id().to_string()))?;

        if stored.is_terminal() && stored != job {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} is already {}",
                job.id(),
                stored.state()
            )));
        }

        *stored = job.clone();
        Ok(())
    }

    async fn find_active_owner(
        &self,
        path: &StoragePath,
    ) -> Result<Option<JobId>, RepositoryError> {
        let jobs = self.jobs.read().await;
        Ok(active_owner(&jobs, path).map(Job::id))
    }
}
