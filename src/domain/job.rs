use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Url;

use super::{JobId, JobParameters, JobState, RemoteHandle, StoragePath};

/// One invocation of a remote compute task, tracked from submission to a terminal state.
///
/// Fields are private so every change goes through a transition method; those
/// methods reject backward moves and any mutation after `Complete` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    pipeline: String,
    state: JobState,
    input_refs: Vec<StoragePath>,
    parameters: JobParameters,
    remote_handle: Option<RemoteHandle>,
    result_refs: BTreeMap<String, Url>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(pipeline: String, input_refs: Vec<StoragePath>, parameters: JobParameters) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            pipeline,
            state: JobState::Queued,
            input_refs,
            parameters,
            remote_handle: None,
            result_refs: BTreeMap::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn input_refs(&self) -> &[StoragePath] {
        &self.input_refs
    }

    pub fn parameters(&self) -> &JobParameters {
        &self.parameters
    }

    pub fn remote_handle(&self) -> Option<&RemoteHandle> {
        self.remote_handle.as_ref()
    }

    pub fn result_refs(&self) -> &BTreeMap<String, Url> {
        &self.result_refs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn owns_input(&self, path: &StoragePath) -> bool {
        self.input_refs.iter().any(|p| p == path)
    }

    pub fn mark_submitted(&mut self, handle: RemoteHandle) -> Result<(), JobTransitionError> {
        if self.remote_handle.is_some() {
            return Err(JobTransitionError::HandleAlreadyAssigned(self.id));
        }
        self.transition(JobState::Submitted)?;
        self.remote_handle = Some(handle);
        Ok(())
    }

    pub fn mark_running(&mut self) -> Result<(), JobTransitionError> {
        self.transition(JobState::Running)
    }

    pub fn complete(&mut self, results: BTreeMap<String, Url>) -> Result<(), JobTransitionError> {
        if results.is_empty() {
            return Err(JobTransitionError::EmptyResults(self.id));
        }
        self.transition(JobState::Complete)?;
        self.result_refs = results;
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobTransitionError> {
        self.transition(JobState::Failed)?;
        self.error = Some(message.into());
        Ok(())
    }

    fn transition(&mut self, next: JobState) -> Result<(), JobTransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(JobTransitionError::Illegal {
                job_id: self.id,
                from: self.state,
                to: next,
            });
        }
        if self.state != next {
            self.state = next;
            self.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobTransitionError {
    #[error("job {job_id} cannot move from {from} to {to}")]
    Illegal {
        job_id: JobId,
        from: JobState,
        to: JobState,
    },
    #[error("job {0} already has a remote handle")]
    HandleAlreadyAssigned(JobId),
    #[error("job {0} cannot complete without results")]
    EmptyResults(JobId),
}
