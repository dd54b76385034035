use reqwest::Url;

/// Turns a provider-returned result path into an absolute URL.
///
/// Absolute `http`/`https` locations are kept as they are; anything else is joined
/// onto `base`, which is treated as a directory even without a trailing slash.
pub fn resolve_result_location(base: &Url, raw: &str) -> Result<Url, ResultLocationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ResultLocationError::Empty);
    }

    if let Ok(url) = Url::parse(raw) {
        return match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ResultLocationError::UnsupportedScheme(other.to_string())),
        };
    }

    let mut directory = base.clone();
    if !directory.path().ends_with('/') {
        let path = format!("{}/", directory.path());
        directory.set_path(&path);
    }

    directory
        .join(raw.trim_start_matches('/'))
        .map_err(|e| ResultLocationError::Invalid(format!("{}: {}", raw, e)))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultLocationError {
    #[error("result location is empty")]
    Empty,
    #[error("unsupported result scheme: {0}")]
    UnsupportedScheme(String),
    #[error("invalid result location {0}")]
    Invalid(String),
}
