/// Scaffold mode swaps the real object store and providers for in-process fakes,
/// so the API can be exercised end to end without credentials.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    /// Status checks a scaffold job answers with `running` before it completes.
    pub polls_until_complete: u32,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("SCAFFOLD_MODE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            polls_until_complete: std::env::var("SCAFFOLD_POLLS_UNTIL_COMPLETE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }
}
