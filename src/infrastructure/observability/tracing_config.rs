use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        let level = logging.level.trim();
        let level = if level.is_empty() { "info" } else { level };

        Self {
            environment: environment.to_string(),
            json_format: logging.enable_json || log_format_is_json(),
            default_filter: format!("{},stemforge=debug,tower_http=debug", level),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: Environment::from_env()
                .map(|e| e.to_string())
                .unwrap_or_else(|_| Environment::Local.to_string()),
            json_format: log_format_is_json(),
            default_filter: "info,stemforge=debug,tower_http=debug".to_string(),
        }
    }
}

fn log_format_is_json() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false)
}
