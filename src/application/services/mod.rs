mod job_orchestrator;
mod job_service;
mod polling;

pub use job_orchestrator::{JobOrchestrator, PollError, SubmissionError};
pub use job_service::{JobService, JobServiceError};
pub use polling::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollFailure, PollingPolicy, WaitError,
    poll_until_terminal,
};
