// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Herald.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use herald_core::AutomationPolicy;
use serde::{Deserialize, Serialize};

/// Top-level Herald configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeraldConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Message selection and presentation behavior.
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "herald".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Message selection and presentation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesConfig {
    /// Delay between a successful fetch and the presentation attempt, in milliseconds.
    #[serde(default = "default_presentation_delay_ms")]
    pub presentation_delay_ms: u64,

    /// Retry interval while another batch holds the presentation lock, in milliseconds.
    #[serde(default = "default_lock_retry_ms")]
    pub lock_retry_ms: u64,

    /// Retry interval while no live anchor is available, in milliseconds.
    #[serde(default = "default_anchor_retry_ms")]
    pub anchor_retry_ms: u64,

    /// Present every fetched message regardless of display history.
    #[serde(default)]
    pub debug: bool,

    /// Run a message check as soon as the message center starts.
    #[serde(default = "default_true")]
    pub check_at_startup: bool,

    /// Treatment of messages governed by the automation system.
    #[serde(default)]
    pub automation: AutomationPolicy,

    /// Report view metrics to the backend.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl MessagesConfig {
    pub fn presentation_delay(&self) -> Duration {
        Duration::from_millis(self.presentation_delay_ms)
    }

    pub fn lock_retry(&self) -> Duration {
        Duration::from_millis(self.lock_retry_ms)
    }

    pub fn anchor_retry(&self) -> Duration {
        Duration::from_millis(self.anchor_retry_ms)
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            presentation_delay_ms: default_presentation_delay_ms(),
            lock_retry_ms: default_lock_retry_ms(),
            anchor_retry_ms: default_anchor_retry_ms(),
            debug: false,
            check_at_startup: true,
            automation: AutomationPolicy::default(),
            metrics_enabled: true,
        }
    }
}

fn default_presentation_delay_ms() -> u64 {
    1000
}

fn default_lock_retry_ms() -> u64 {
    1000
}

fn default_anchor_retry_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the messages API. `None` disables remote fetching.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Locale sent as `Accept-Language`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a transient HTTP status (429, 500, 503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            locale: default_locale(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Local persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding display history and receipts.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("herald").join("herald.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "herald.db".to_string())
}
