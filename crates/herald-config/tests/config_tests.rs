// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Herald configuration system.

use std::io::Write;

use herald_config::diagnostic::ConfigError;
use herald_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_str,
};
use herald_core::AutomationPolicy;
use serial_test::serial;

#[test]
fn full_config_deserializes() {
    let toml = r#"
[app]
name = "shop"
log_level = "debug"

[messages]
presentation_delay_ms = 250
lock_retry_ms = 2000
anchor_retry_ms = 100
debug = true
check_at_startup = false
automation = "end_date"
metrics_enabled = false

[api]
base_url = "https://api.example.com/v1"
api_token = "tok"
locale = "it"
timeout_secs = 5
max_retries = 0

[storage]
database_path = "/tmp/herald.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "shop");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.messages.presentation_delay_ms, 250);
    assert_eq!(config.messages.lock_retry_ms, 2000);
    assert_eq!(config.messages.anchor_retry_ms, 100);
    assert!(config.messages.debug);
    assert!(!config.messages.check_at_startup);
    assert_eq!(config.messages.automation, AutomationPolicy::EndDate);
    assert!(!config.messages.metrics_enabled);
    assert_eq!(
        config.api.base_url.as_deref(),
        Some("https://api.example.com/v1")
    );
    assert_eq!(config.api.api_token.as_deref(), Some("tok"));
    assert_eq!(config.api.locale, "it");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.api.max_retries, 0);
    assert_eq!(config.storage.database_path, "/tmp/herald.db");
    assert!(!config.storage.wal_mode);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.app.name, "herald");
    assert_eq!(config.messages.lock_retry_ms, 1000);
    assert_eq!(config.messages.anchor_retry_ms, 500);
    assert!(config.api.base_url.is_none());
    assert!(config.storage.wal_mode);
}

#[test]
fn unknown_key_gets_a_suggestion_and_span() {
    let toml = "[messages]\nlock_retry_msec = 5\n";

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "lock_retry_msec");
            assert_eq!(suggestion.as_deref(), Some("lock_retry_ms"));
            assert!(span.is_some());
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[mesages]\ndebug = true\n").expect_err("bad section");
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "messages"
    ));
}

#[test]
fn wrong_type_is_reported_with_key_path() {
    let errors =
        load_and_validate_str("[messages]\ndebug = \"yes\"\n").expect_err("bad type");
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "messages.debug"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn validation_errors_are_all_collected() {
    let toml = r#"
[app]
log_level = "loud"

[messages]
lock_retry_ms = 0

[api]
timeout_secs = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 3);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[messages]\nlock_retry_ms = 1500\nanchor_retry_ms = 700").unwrap();

    // SAFETY: env mutation is serialized by #[serial].
    unsafe { std::env::set_var("HERALD_MESSAGES_LOCK_RETRY_MS", "3000") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("HERALD_MESSAGES_LOCK_RETRY_MS") };

    let config = result.expect("config should load");
    assert_eq!(config.messages.lock_retry_ms, 3000);
    assert_eq!(config.messages.anchor_retry_ms, 700);
}

#[test]
#[serial]
fn env_can_set_api_token() {
    let file = tempfile::NamedTempFile::new().unwrap();

    unsafe { std::env::set_var("HERALD_API_API_TOKEN", "secret") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("HERALD_API_API_TOKEN") };

    assert_eq!(
        result.expect("config should load").api.api_token.as_deref(),
        Some("secret")
    );
}
