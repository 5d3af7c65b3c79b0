// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::FixdeskConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates semantic constraints serde cannot express.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &FixdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "backend.base_url", &config.backend.base_url);
    check_url(&mut errors, "assistant.base_url", &config.assistant.base_url);

    if config.backend.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.timeout_secs must be greater than 0".to_string(),
        });
    }
    if config.assistant.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "assistant.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.knowledge.content_type.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "knowledge.content_type must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let value = value.trim();
    let has_scheme = value.starts_with("http://") || value.starts_with("https://");
    let host = value.split("://").nth(1).unwrap_or_default();
    if !has_scheme || host.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` must be an http:// or https:// URL"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&FixdeskConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = FixdeskConfig::default();
        config.backend.base_url = "ftp://nope".into();
        config.assistant.timeout_secs = 0;
        config.logging.level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn url_without_host_is_rejected() {
        let mut config = FixdeskConfig::default();
        config.assistant.base_url = "http://".into();
        assert!(validate_config(&config).is_err());
    }
}
