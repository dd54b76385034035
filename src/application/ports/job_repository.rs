use async_trait::async_trait;

use crate::domain::{Job, JobId, StoragePath};

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job. Fails with `ConstraintViolation` when the id exists or an
    /// input is already owned by a job that has not reached a terminal state.
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Replaces the stored snapshot of an existing job.
    async fn update(&self, job: &Job) -> Result<(), RepositoryError>;

    /// Returns the non-terminal job that owns `path`, if any.
    async fn find_active_owner(&self, path: &StoragePath)
    -> Result<Option<JobId>, RepositoryError>;
}
