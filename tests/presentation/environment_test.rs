use stemforge::presentation::config::Environment;

#[test]
fn given_aliases_when_parsing_environment_then_mapped_to_canonical_value() {
    assert_eq!(Environment::try_from("development".to_string()), Ok(Environment::Local));
    assert_eq!(Environment::try_from(" PROD ".to_string()), Ok(Environment::Prod));
    assert_eq!(Environment::try_from("test".to_string()), Ok(Environment::Test));
}

#[test]
fn given_unknown_environment_when_parsing_then_error_names_variable() {
    let err = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(err.contains("APP_ENVIRONMENT"));
}

#[test]
fn given_environment_when_resolving_settings_file_then_includes_name() {
    assert_eq!(Environment::Local.settings_file(), "appsettings.local");
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
}
