//! Unit tests for configuration loading
//!
//! Tests:
//! - TOML parsing with defaults for omitted sections
//! - Missing config files fall back to defaults
//! - CLI > environment > TOML priority for service settings
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use casebridge_common::config::{
    require_setting, resolve_setting, TomlConfig, CONFIG_ENV_VAR,
};
use casebridge_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_empty_toml_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert_eq!(config.transport.max_retries, 5);
    assert_eq!(config.transport.retry_limit(), Some(5));
    assert_eq!(config.transport.backoff_truncation, 8);
    assert_eq!(config.transport.page_size, 100);
    assert!(!config.submission.send_absent_phenotypes);
    assert!(config.submission.strict_inheritance);
    assert!(!config.submission.rollback_on_failure);
    assert_eq!(config.logging.level, "info");
    assert!(config.selection.biotypes.is_none());
}

#[test]
fn test_full_toml_is_parsed() {
    let config = TomlConfig::from_toml_str(
        r#"
        [source]
        url = "https://cases.example.org/"
        user = "sender"
        password = "secret"

        [registry]
        url = "https://registry.example.org/api/"
        system_key = "sys"
        user_key = "usr"

        [transport]
        max_retries = -1
        backoff_truncation = 4

        [submission]
        send_absent_phenotypes = true
        strict_inheritance = false

        [selection]
        biotypes = ["protein_coding"]

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.source.url.as_deref(), Some("https://cases.example.org/"));
    assert_eq!(config.registry.system_key.as_deref(), Some("sys"));
    assert_eq!(config.transport.retry_limit(), None);
    assert_eq!(config.transport.backoff_truncation, 4);
    assert_eq!(config.transport.timeout_secs, 60);
    assert!(config.submission.send_absent_phenotypes);
    assert!(!config.submission.strict_inheritance);
    assert_eq!(
        config.selection.biotypes,
        Some(vec!["protein_coding".to_string()])
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let result = TomlConfig::from_toml_str("[transport]\nmax_retries = \"many\"");
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();

    let config = TomlConfig::load_or_default(Some(file.path())).unwrap();

    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    let result = TomlConfig::load_or_default(Some(std::path::Path::new(
        "/nonexistent/casebridge/config.toml",
    )));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_config_env_var_locates_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[transport]\npage_size = 25").unwrap();
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = TomlConfig::load_or_default(None).unwrap();

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(config.transport.page_size, 25);
}

#[test]
#[serial]
fn test_setting_priority_cli_env_toml() {
    env::remove_var("CASEBRIDGE_TEST_URL");

    // TOML only
    assert_eq!(
        resolve_setting(None, "CASEBRIDGE_TEST_URL", Some("toml")).as_deref(),
        Some("toml")
    );

    // Environment beats TOML
    env::set_var("CASEBRIDGE_TEST_URL", "env");
    assert_eq!(
        resolve_setting(None, "CASEBRIDGE_TEST_URL", Some("toml")).as_deref(),
        Some("env")
    );

    // CLI beats both
    assert_eq!(
        resolve_setting(Some("cli"), "CASEBRIDGE_TEST_URL", Some("toml")).as_deref(),
        Some("cli")
    );

    env::remove_var("CASEBRIDGE_TEST_URL");
}

#[test]
#[serial]
fn test_missing_required_setting_names_all_sources() {
    env::remove_var("CASEBRIDGE_TEST_KEY");

    let err = require_setting(
        "registry-user-key",
        None,
        "CASEBRIDGE_TEST_KEY",
        None,
        "registry.user_key",
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("--registry-user-key"));
    assert!(message.contains("CASEBRIDGE_TEST_KEY"));
    assert!(message.contains("registry.user_key"));
}
