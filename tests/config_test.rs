//! Settings loading from the environment

use academy_admin::config::Settings;
use academy_admin::utils::errors::AcademyError;
use assert_matches::assert_matches;
use serial_test::serial;
use tokio_test::{assert_err, assert_ok};

const VARS: &[&str] = &[
    "ACADEMY__API__BASE_URL",
    "ACADEMY__API__AUTH_TOKEN",
    "ACADEMY__LOGGING__LEVEL",
    "ACADEMY__STORAGE__EXPORT_DIR",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_overrides() {
    clear_env();
    let settings = Settings::new().unwrap();

    assert_eq!(settings.api.base_url, "http://localhost:3000");
    assert_eq!(settings.api.auth_token, None);
    assert_eq!(settings.list.default_page_size, 20);
    assert_eq!(settings.import.batch_size, 5);
    assert_ok!(settings.validate());
}

#[test]
#[serial]
fn test_environment_overrides_nested_keys() {
    clear_env();
    std::env::set_var("ACADEMY__API__BASE_URL", "https://api.academia.example");
    std::env::set_var("ACADEMY__API__AUTH_TOKEN", "token-123");
    std::env::set_var("ACADEMY__STORAGE__EXPORT_DIR", "/tmp/exports");

    let settings = Settings::new().unwrap();
    clear_env();

    assert_eq!(settings.api.base_url, "https://api.academia.example");
    assert_eq!(settings.api.auth_token.as_deref(), Some("token-123"));
    assert_eq!(settings.storage.export_dir, "/tmp/exports");
    assert_eq!(settings.api.health_path, "/health");
    assert_ok!(settings.validate());
}

#[test]
#[serial]
fn test_bad_override_fails_validation() {
    clear_env();
    std::env::set_var("ACADEMY__LOGGING__LEVEL", "verbose");

    let settings = Settings::new().unwrap();
    clear_env();

    let err = assert_err!(settings.validate());
    assert_matches!(err, AcademyError::Config(message) if message.contains("verbose"));
}
