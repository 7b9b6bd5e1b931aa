// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::HeraldConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check semantic constraints serde cannot express.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &HeraldConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        fail(format!(
            "app.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.app.log_level
        ));
    }

    if config.messages.lock_retry_ms == 0 {
        fail("messages.lock_retry_ms must be greater than 0".to_string());
    }
    if config.messages.anchor_retry_ms == 0 {
        fail("messages.anchor_retry_ms must be greater than 0".to_string());
    }

    if let Some(url) = &config.api.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!(
                "api.base_url must start with http:// or https://, got `{url}`"
            ));
        }
    }
    if config.api.timeout_secs == 0 {
        fail("api.timeout_secs must be greater than 0".to_string());
    }
    if config.api.locale.trim().is_empty() {
        fail("api.locale must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
