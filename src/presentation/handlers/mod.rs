mod check;
mod error;
mod health;
mod job_status;
mod job_view;
mod pipelines;
mod submit;
mod wait;

pub use check::{CheckRequest, check_handler};
pub use error::ErrorResponse;
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use job_view::JobResponse;
pub use pipelines::{PipelinesResponse, PollingHint, pipelines_handler};
pub use submit::{SubmitRequest, SubmitResponse, submit_handler};
pub use wait::{WaitTimeoutResponse, wait_handler};
