use std::fmt;

/// Identifier the compute provider assigned to a job. Opaque to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteHandle(String);

impl RemoteHandle {
    /// Returns `None` for blank identifiers; a provider answering with one has not created a job.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
