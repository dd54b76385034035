use stemforge::infrastructure::observability::TracingConfig;
use stemforge::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_logging_level_when_building_config_then_filter_starts_with_level() {
    let logging = LoggingSettings {
        level: "warn".to_string(),
        enable_json: false,
    };

    let config = TracingConfig::from_settings(Environment::Test, &logging);

    assert_eq!(config.environment, "test");
    assert!(config.default_filter.starts_with("warn,"));
    assert!(config.default_filter.contains("stemforge=debug"));
}

#[test]
fn given_json_enabled_when_building_config_then_json_format() {
    let logging = LoggingSettings {
        level: "info".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::from_settings(Environment::Prod, &logging);

    assert!(config.json_format);
}

#[test]
fn given_blank_level_when_building_config_then_defaults_to_info() {
    let logging = LoggingSettings {
        level: "  ".to_string(),
        enable_json: false,
    };

    let config = TracingConfig::from_settings(Environment::Local, &logging);

    assert!(config.default_filter.starts_with("info,"));
}
