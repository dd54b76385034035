use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an orchestrated job.
///
/// States only ever move forward: `Queued -> Submitted -> Running* -> Complete | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Submitted,
    Running,
    Complete,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Submitted => "submitted",
            JobState::Running => "running",
            JobState::Complete => "complete",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }

    /// Position in the forward ordering. Terminal states share the highest rank.
    pub fn rank(&self) -> u8 {
        match self {
            JobState::Queued => 0,
            JobState::Submitted => 1,
            JobState::Running => 2,
            JobState::Complete | JobState::Failed => 3,
        }
    }

    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Queued, JobState::Submitted)
                | (JobState::Submitted, JobState::Running)
                | (JobState::Submitted, JobState::Failed)
                | (JobState::Running, JobState::Running)
                | (JobState::Running, JobState::Complete)
                | (JobState::Running, JobState::Failed)
        )
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobState::Queued),
            "submitted" => Ok(JobState::Submitted),
            "running" => Ok(JobState::Running),
            "complete" => Ok(JobState::Complete),
            "failed" => Ok(JobState::Failed),
            _ => Err(format!("Invalid job state: {}", s)),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
