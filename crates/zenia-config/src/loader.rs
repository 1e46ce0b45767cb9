// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./zenia.toml` > `~/.config/zenia/zenia.toml` > `/etc/zenia/zenia.toml`
//! with environment variable overrides via `ZENIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ZeniaConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/zenia/zenia.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "zenia.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zenia").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/zenia/zenia.toml` (system-wide)
/// 3. `~/.config/zenia/zenia.toml` (user XDG config)
/// 4. `./zenia.toml` (local directory)
/// 5. `ZENIA_*` environment variables
pub fn load_config() -> Result<ZeniaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ZeniaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZeniaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ZeniaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZeniaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ZeniaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ZENIA_MEMORY_SIMILARITY_THRESHOLD` must become
/// `memory.similarity_threshold`, not `memory.similarity.threshold`.
fn env_provider() -> Env {
    Env::prefixed("ZENIA_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to its dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ["agent", "storage", "memory"] {
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
    fn env_keys_map_first_underscore_only() {
        assert_eq!(
            map_env_key("memory_similarity_threshold"),
            "memory.similarity_threshold"
        );
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("agent_log_level"), "agent.log_level");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("theme"), "theme");
        assert_eq!(map_env_key("memoryless"), "memoryless");
    }
}
