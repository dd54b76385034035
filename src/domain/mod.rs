mod job;
mod job_id;
mod job_parameters;
mod job_state;
mod remote_handle;
mod result_location;
mod signed_url;
mod storage_path;

pub use job::{Job, JobTransitionError};
pub use job_id::JobId;
pub use job_parameters::JobParameters;
pub use job_state::JobState;
pub use remote_handle::RemoteHandle;
pub use result_location::{ResultLocationError, resolve_result_location};
pub use signed_url::SignedUrl;
pub use storage_path::{StoragePath, StoragePathError};
