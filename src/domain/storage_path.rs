use std::fmt;

const MAX_PATH_LENGTH: usize = 1024;

/// Key of a staged input artifact inside the object store, relative to the bucket root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn parse(raw: impl Into<String>) -> Result<Self, StoragePathError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(StoragePathError::Empty);
        }
        if raw.len() > MAX_PATH_LENGTH {
            return Err(StoragePathError::TooLong(raw.len()));
        }
        if raw.starts_with('/') {
            return Err(StoragePathError::Absolute(raw));
        }
        if raw.chars().any(char::is_control) {
            return Err(StoragePathError::InvalidSegment(raw));
        }
        if raw
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StoragePathError::InvalidSegment(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoragePathError {
    #[error("storage path is empty")]
    Empty,
    #[error("storage path is {0} bytes long")]
    TooLong(usize),
    #[error("storage path must be relative: {0}")]
    Absolute(String),
    #[error("storage path has an invalid segment: {0}")]
    InvalidSegment(String),
}
