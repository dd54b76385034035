mod compute_provider;
mod job_repository;
mod repository_error;
mod staging_store;

pub use compute_provider::{ComputeProvider, ComputeProviderError, ProviderResult, ProviderStatus};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use staging_store::{StagingStore, StagingStoreError};
