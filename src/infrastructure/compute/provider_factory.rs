use std::sync::Arc;

use reqwest::Url;

use crate::application::ports::{ComputeProvider, ComputeProviderError};
use crate::presentation::config::{ComputeProviderSetting, PipelineSettings};

use super::gradio_provider::GradioComputeProvider;
use super::json_provider::JsonComputeProvider;
use super::scripted_provider::ScriptedComputeProvider;

pub struct ComputeProviderFactory;

impl ComputeProviderFactory {
    /// Builds the adapter a pipeline is configured for. `scripted_polls` is the
    /// number of `running` answers a scripted provider gives before completing.
    pub fn create(
        pipeline: &str,
        settings: &PipelineSettings,
        scripted_polls: u32,
    ) -> Result<Arc<dyn ComputeProvider>, ComputeProviderError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ComputeProviderError::Configuration(format!(
                "pipeline {}: invalid base_url {}: {}",
                pipeline, settings.base_url, e
            ))
        })?;
        let api_token = settings.api_token.clone().filter(|t| !t.is_empty());

        match settings.provider {
            ComputeProviderSetting::Gradio => {
                let gradio = settings.gradio.as_ref().ok_or_else(|| {
                    ComputeProviderError::Configuration(format!(
                        "pipeline {}: gradio provider requires a [gradio] section",
                        pipeline
                    ))
                })?;
                tracing::info!(pipeline, base_url = %base_url, endpoint = %gradio.endpoint, "Using Gradio compute provider");
                let provider = GradioComputeProvider::new(
                    base_url,
                    gradio.endpoint.clone(),
                    api_token,
                    gradio.arguments.clone(),
                    settings.result_names.clone(),
                    settings.request_timeout(),
                )?;
                Ok(Arc::new(provider))
            }
            ComputeProviderSetting::Json => {
                tracing::info!(pipeline, base_url = %base_url, "Using JSON compute provider");
                let provider = JsonComputeProvider::new(
                    base_url,
                    api_token,
                    settings.result_names.clone(),
                    settings.request_timeout(),
                )?;
                Ok(Arc::new(provider))
            }
            ComputeProviderSetting::Scripted => {
                tracing::info!(pipeline, polls = scripted_polls, "Using scripted compute provider");
                Ok(Arc::new(ScriptedComputeProvider::new(
                    base_url,
                    scripted_polls,
                    settings.result_names.clone(),
                )))
            }
        }
    }
}
