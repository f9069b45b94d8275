// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/switchyard/switchyard.toml`, then
//! `~/.config/switchyard/switchyard.toml`, then `./switchyard.toml`, with
//! `SWITCHYARD_*` environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SwitchyardConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/switchyard/switchyard.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "switchyard.toml";

/// Per-user config path under the XDG config directory.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("switchyard").join("switchyard.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchyard/switchyard.toml`
/// 3. `~/.config/switchyard/switchyard.toml`
/// 4. `./switchyard.toml`
/// 5. `SWITCHYARD_*` environment variables
pub fn load_config() -> Result<SwitchyardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchyardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwitchyardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `SWITCHYARD_<SECTION>_<KEY>` to `section.key`.
///
/// Keys themselves contain underscores (`cost_ceiling_usd`), so only the
/// first segment is treated as the section.
fn env_provider() -> Env {
    Env::prefixed("SWITCHYARD_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["app", "anthropic", "storage", "routing", "cost", "prompt"];

    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("routing_cost_ceiling_usd"), "routing.cost_ceiling_usd");
        assert_eq!(map_env_key("anthropic_api_key"), "anthropic.api_key");
        assert_eq!(map_env_key("app_log_level"), "app.log_level");
        assert_eq!(map_env_key("cost_trend_days"), "cost.trend_days");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("telemetry_endpoint"), "telemetry_endpoint");
    }

    #[test]
    fn env_overrides_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [routing]
                cost_ceiling_usd = 0.25
                "#,
            )?;
            jail.set_env("SWITCHYARD_ROUTING_COST_CEILING_USD", "0.5");
            jail.set_env("SWITCHYARD_APP_LOG_LEVEL", "debug");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.routing.cost_ceiling_usd, 0.5);
            assert_eq!(config.app.log_level, "debug");
            Ok(())
        });
    }
}
