// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./herald.toml` > `~/.config/herald/herald.toml` > `/etc/herald/herald.toml`,
//! with `HERALD_` environment variables overriding every file.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::{debug, warn};

use crate::model::HeraldConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/herald/herald.toml";
pub(crate) const LOCAL_CONFIG: &str = "herald.toml";

/// Config sections that environment keys are split on.
const SECTIONS: &[&str] = &["app", "messages", "api", "storage"];

/// Path of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("herald").join("herald.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/herald/herald.toml`
/// 3. `~/.config/herald/herald.toml`
/// 4. `./herald.toml`
/// 5. `HERALD_*` environment variables
pub fn load_config() -> Result<HeraldConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<HeraldConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HeraldConfig, figment::Error> {
    if path.is_file() {
        debug!(path = %path.display(), "loading configuration file");
    } else {
        warn!(path = %path.display(), "configuration file not found, using defaults");
    }
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HeraldConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Maps `HERALD_MESSAGES_LOCK_RETRY_MS` to `messages.lock_retry_ms`.
///
/// Only the first underscore after a known section name becomes a dot;
/// `Env::split("_")` would break keys such as `lock_retry_ms`.
fn env_provider() -> Env {
    Env::prefixed("HERALD_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
