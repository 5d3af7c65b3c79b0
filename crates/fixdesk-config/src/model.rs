// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for fixdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level fixdesk configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FixdeskConfig {
    /// Conversation, log, and knowledge-base service.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Assistant query and context service.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Knowledge-base write settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Root URL of the backend (the `/api/...` paths are appended).
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

/// Assistant service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Root URL of the assistant service.
    #[serde(default = "default_assistant_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Answers are generated by a model,
    /// so this is longer than the backend timeout.
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_assistant_url(),
            timeout_secs: default_assistant_timeout(),
        }
    }
}

fn default_assistant_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_assistant_timeout() -> u64 {
    120
}

/// Knowledge-base entry settings used by solution capture.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Content type tag written on new entries.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Machine id used when the log's machine name is not in the machine list.
    #[serde(default = "default_machine_id")]
    pub default_machine_id: i64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            content_type: default_content_type(),
            default_machine_id: default_machine_id(),
        }
    }
}

fn default_content_type() -> String {
    "Guide".to_string()
}

fn default_machine_id() -> i64 {
    1
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_services() {
        let config = FixdeskConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.assistant.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.knowledge.content_type, "Guide");
        assert_eq!(config.knowledge.default_machine_id, 1);
        assert_eq!(config.logging.level, "info");
    }
}
