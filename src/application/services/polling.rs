use std::future::Future;
use std::time::Duration;

use crate::domain::{Job, JobId, JobState};

use super::PollError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Caller-side polling budget: a fixed delay between checks and a bounded number of checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollingPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Upper bound on the time spent waiting between checks.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Errors a poll step can return; transient ones cost an attempt instead of ending the loop.
pub trait PollFailure {
    fn is_transient(&self) -> bool;
}

impl PollFailure for PollError {
    fn is_transient(&self) -> bool {
        PollError::is_transient(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WaitError<E>
where
    E: std::error::Error + 'static,
{
    /// The budget ran out. The remote job was not cancelled and may still be processing.
    #[error(
        "job {job_id} is still {last_state} after {attempts} status checks; it may still be processing"
    )]
    Timeout {
        job_id: JobId,
        attempts: u32,
        last_state: JobState,
        job: Box<Job>,
    },
    #[error(transparent)]
    Poll(E),
}

/// Calls `poll` until the job is `Complete` or `Failed`, sleeping `policy.interval`
/// between calls. Returns immediately when handed a terminal job.
pub async fn poll_until_terminal<F, Fut, E>(
    job: Job,
    policy: &PollingPolicy,
    mut poll: F,
) -> Result<Job, WaitError<E>>
where
    F: FnMut(Job) -> Fut,
    Fut: Future<Output = Result<Job, E>>,
    E: PollFailure + std::error::Error + 'static,
{
    let mut current = job;

    for attempt in 1..=policy.max_attempts {
        if current.is_terminal() {
            return Ok(current);
        }
        if attempt > 1 {
            tokio::time::sleep(policy.interval).await;
        }

        match poll(current.clone()).await {
            Ok(next) => current = next,
            Err(e) if e.is_transient() => {
                tracing::warn!(
                    job_id = %current.id(),
                    attempt,
                    error = %e,
                    "Transient status check failure, retrying"
                );
            }
            Err(e) => return Err(WaitError::Poll(e)),
        }
    }

    if current.is_terminal() {
        return Ok(current);
    }

    tracing::warn!(
        job_id = %current.id(),
        attempts = policy.max_attempts,
        state = %current.state(),
        "Polling budget exhausted"
    );

    Err(WaitError::Timeout {
        job_id: current.id(),
        attempts: policy.max_attempts,
        last_state: current.state(),
        job: Box::new(current),
    })
}
