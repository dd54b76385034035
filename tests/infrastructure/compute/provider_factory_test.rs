use stemforge::application::ports::{ComputeProvider, ComputeProviderError};
use stemforge::infrastructure::compute::ComputeProviderFactory;
use stemforge::presentation::config::{ComputeProviderSetting, PipelineSettings};

fn pipeline(provider: ComputeProviderSetting, base_url: &str) -> PipelineSettings {
    PipelineSettings {
        provider,
        base_url: base_url.to_string(),
        api_token: None,
        result_names: vec!["audio".to_string()],
        request_timeout_secs: 30,
        gradio: None,
    }
}

#[test]
fn given_json_pipeline_when_creating_then_provider_uses_configured_base() {
    let settings = pipeline(ComputeProviderSetting::Json, "http://melody.internal:8001");

    let provider = ComputeProviderFactory::create("melody", &settings, 0).unwrap();

    assert_eq!(provider.base_url().as_str(), "http://melody.internal:8001/");
}

#[test]
fn given_gradio_pipeline_without_section_when_creating_then_configuration_error() {
    let settings = pipeline(ComputeProviderSetting::Gradio, "http://space.internal:7860");

    let result = ComputeProviderFactory::create("voice_clone", &settings, 0);

    assert!(matches!(result, Err(ComputeProviderError::Configuration(_))));
}

#[test]
fn given_invalid_base_url_when_creating_then_configuration_error() {
    let settings = pipeline(ComputeProviderSetting::Scripted, "not a url");

    let result = ComputeProviderFactory::create("melody", &settings, 1);

    assert!(matches!(result, Err(ComputeProviderError::Configuration(_))));
}
