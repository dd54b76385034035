mod environment;
mod scaffold_config;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use scaffold_config::ScaffoldConfig;
pub use settings::{
    ComputeProviderSetting, GradioArgument, GradioSettings, LoggingSettings,
    MAX_SIGNED_URL_TTL_SECS, MIN_SIGNED_URL_TTL_SECS, ParamKind, PipelineSettings,
    PollingSettings, ServerSettings, Settings, SettingsError, StorageProviderSetting,
    StorageSettings,
};
