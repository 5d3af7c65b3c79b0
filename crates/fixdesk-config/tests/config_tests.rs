// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the fixdesk configuration system.

use fixdesk_config::diagnostic::ConfigError;
use fixdesk_config::{load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[backend]
base_url = "http://backend.local:8000"
timeout_secs = 10

[assistant]
base_url = "https://assistant.local"
timeout_secs = 300

[knowledge]
content_type = "Runbook"
default_machine_id = 4

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.backend.base_url, "http://backend.local:8000");
    assert_eq!(config.backend.timeout_secs, 10);
    assert_eq!(config.assistant.base_url, "https://assistant.local");
    assert_eq!(config.assistant.timeout_secs, 300);
    assert_eq!(config.knowledge.content_type, "Runbook");
    assert_eq!(config.knowledge.default_machine_id, 4);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.backend.timeout_secs, 30);
    assert_eq!(config.assistant.timeout_secs, 120);
    assert_eq!(config.knowledge.content_type, "Guide");
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[backend]\ntimeout_secs = 5\n").unwrap();
    assert_eq!(config.backend.timeout_secs, 5);
    assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = "[backend]\nbase_ulr = \"http://x\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "base_ulr");
            assert_eq!(suggestion.as_deref(), Some("base_url"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[metrics]\nenabled = true\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[backend]\ntimeout_secs = \"soon\"\n").unwrap_err();
    assert!(
        matches!(errors[0], ConfigError::InvalidType { .. }),
        "got {:?}",
        errors[0]
    );
}

#[test]
fn validation_runs_after_parsing() {
    let errors = load_and_validate_str("[logging]\nlevel = \"chatty\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::Validation { message } => assert!(message.contains("logging.level")),
        other => panic!("expected Validation, got {other:?}"),
    }
}
