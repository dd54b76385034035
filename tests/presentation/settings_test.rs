use std::time::Duration;

use config::{Config, File, FileFormat};
use serde_json::json;
use stemforge::presentation::config::{
    ComputeProviderSetting, GradioArgument, ParamKind, Settings, SettingsError,
    StorageProviderSetting,
};

const BASE: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[logging]
level = "info"

[storage]
provider = "memory"
"#;

const PIPELINES: &str = r#"
[pipelines.voice_clone]
provider = "gradio"
base_url = "http://127.0.0.1:7860"
result_names = ["audio"]

[pipelines.voice_clone.gradio]
arguments = [
    { input = 0 },
    { param = "pitch", default = 0, kind = "integer" },
    { value = "rmvpe" },
]

[pipelines.melody]
provider = "json"
base_url = "http://127.0.0.1:8001"
"#;

fn parse(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_minimal_file_when_loading_then_defaults_applied() {
    let settings = parse(&format!("{}{}", BASE, PIPELINES));

    assert_eq!(settings.storage.provider, StorageProviderSetting::Memory);
    assert_eq!(settings.storage.signed_url_ttl(), Duration::from_secs(600));
    assert_eq!(settings.polling.policy().interval, Duration::from_secs(3));
    assert_eq!(settings.polling.max_attempts, 60);
    assert!(!settings.logging.enable_json);
    assert!(settings.validate().is_ok());
}

#[test]
fn given_gradio_pipeline_when_loading_then_argument_slots_parsed_in_order() {
    let settings = parse(&format!("{}{}", BASE, PIPELINES));
    let voice = &settings.pipelines["voice_clone"];
    let gradio = voice.gradio.as_ref().unwrap();

    assert_eq!(voice.provider, ComputeProviderSetting::Gradio);
    assert_eq!(gradio.endpoint, "predict");
    assert_eq!(
        gradio.arguments,
        vec![
            GradioArgument::Input { input: 0 },
            GradioArgument::Param {
                param: "pitch".to_string(),
                default: Some(json!(0)),
                kind: Some(ParamKind::Integer),
            },
            GradioArgument::Literal {
                value: json!("rmvpe"),
            },
        ]
    );
    assert_eq!(settings.pipelines["melody"].request_timeout(), Duration::from_secs(30));
}

#[test]
fn given_ttl_outside_range_when_validating_then_rejected() {
    let toml = format!("{}signed_url_ttl_secs = 30\n{}", BASE, PIPELINES);
    let settings = parse(&toml);

    assert!(matches!(settings.validate(), Err(SettingsError::SignedUrlTtl(30))));
}

#[test]
fn given_no_pipelines_when_validating_then_rejected() {
    let settings = parse(BASE);

    assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
}

#[test]
fn given_gradio_pipeline_without_arguments_when_validating_then_rejected() {
    let toml = format!(
        "{}{}",
        BASE,
        r#"
[pipelines.voice_clone]
provider = "gradio"
base_url = "http://127.0.0.1:7860"
"#
    );
    let settings = parse(&toml);

    assert!(matches!(
        settings.validate(),
        Err(SettingsError::Pipeline { name, .. }) if name == "voice_clone"
    ));
}

#[test]
fn given_invalid_base_url_when_validating_then_rejected() {
    let toml = format!(
        "{}{}",
        BASE,
        r#"
[pipelines.melody]
provider = "json"
base_url = "melody service"
"#
    );

    assert!(matches!(
        parse(&toml).validate(),
        Err(SettingsError::Pipeline { .. })
    ));
}
