// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/fixdesk/fixdesk.toml`
//! 3. `~/.config/fixdesk/fixdesk.toml`
//! 4. `./fixdesk.toml`
//! 5. `FIXDESK_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FixdeskConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/fixdesk/fixdesk.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "fixdesk.toml";

/// Sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &["backend", "assistant", "knowledge", "logging"];

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fixdesk").join("fixdesk.toml"))
}

/// Builds the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(FixdeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<FixdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from a TOML string over the defaults (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<FixdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FixdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Loads configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FixdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FixdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `FIXDESK_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `FIXDESK_BACKEND_BASE_URL` maps to `backend.base_url`.
fn env_provider() -> Env {
    Env::prefixed("FIXDESK_").map(|key| {
        let key = key.as_str();
        for section in ENV_SECTIONS {
            if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
                return format!("{section}.{rest}").into();
            }
        }
        key.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FIXDESK_BACKEND_BASE_URL", "http://backend:9000");
            jail.set_env("FIXDESK_KNOWLEDGE_DEFAULT_MACHINE_ID", "5");
            let config: FixdeskConfig = Figment::new()
                .merge(Serialized::defaults(FixdeskConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.backend.base_url, "http://backend:9000");
            assert_eq!(config.knowledge.default_machine_id, 5);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_read_from_working_directory() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
                [logging]
                level = "debug"
                "#,
            )?;
            let config = load_config_from_path(Path::new(LOCAL_CONFIG_FILE))?;
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }
}
