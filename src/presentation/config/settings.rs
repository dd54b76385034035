use std::collections::HashMap;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;
use serde_json::Value;

use crate::application::services::PollingPolicy;

use super::Environment;

pub const MIN_SIGNED_URL_TTL_SECS: u64 = 60;
pub const MAX_SIGNED_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub pipelines: HashMap<String, PipelineSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    #[serde(default)]
    pub enable_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub supabase_bucket: Option<String>,
}

impl StorageSettings {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Azure,
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl PollingSettings {
    pub fn policy(&self) -> PollingPolicy {
        PollingPolicy::new(Duration::from_millis(self.interval_ms), self.max_attempts)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        let policy = PollingPolicy::default();
        Self {
            interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
        }
    }
}

/// One named compute pipeline (melody generation, voice cloning, sample generation, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub provider: ComputeProviderSetting,
    pub base_url: String,
    pub api_token: Option<String>,
    /// Names given to positional results, in provider order.
    #[serde(default)]
    pub result_names: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub gradio: Option<GradioSettings>,
}

impl PipelineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeProviderSetting {
    Gradio,
    Json,
    Scripted,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradioSettings {
    #[serde(default = "default_gradio_endpoint")]
    pub endpoint: String,
    pub arguments: Vec<GradioArgument>,
}

/// One positional slot of a Gradio `data` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GradioArgument {
    /// Signed URL of the input at this index.
    Input { input: usize },
    /// Caller parameter, with an optional fallback and coercion.
    Param {
        param: String,
        #[serde(default)]
        default: Option<Value>,
        #[serde(default)]
        kind: Option<ParamKind>,
    },
    /// Fixed value sent on every call.
    Literal { value: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Float,
    String,
}

fn default_signed_url_ttl_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_gradio_endpoint() -> String {
    "predict".to_string()
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP__`-prefixed environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let ttl = self.storage.signed_url_ttl_secs;
        if !(MIN_SIGNED_URL_TTL_SECS..=MAX_SIGNED_URL_TTL_SECS).contains(&ttl) {
            return Err(SettingsError::SignedUrlTtl(ttl));
        }
        if self.polling.max_attempts == 0 {
            return Err(SettingsError::Invalid(
                "polling.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.pipelines.is_empty() {
            return Err(SettingsError::Invalid(
                "at least one pipeline must be configured".to_string(),
            ));
        }

        for (name, pipeline) in &self.pipelines {
            if reqwest::Url::parse(&pipeline.base_url).is_err() {
                return Err(SettingsError::Pipeline {
                    name: name.clone(),
                    reason: format!("invalid base_url: {}", pipeline.base_url),
                });
            }
            if pipeline.provider == ComputeProviderSetting::Gradio && pipeline.gradio.is_none() {
                return Err(SettingsError::Pipeline {
                    name: name.clone(),
                    reason: "gradio provider requires a [gradio] section".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("storage.signed_url_ttl_secs must be between 60 and 3600, got {0}")]
    SignedUrlTtl(u64),
    #[error("pipeline {name}: {reason}")]
    Pipeline { name: String, reason: String },
    #[error("{0}")]
    Invalid(String),
}
