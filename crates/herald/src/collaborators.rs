// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the concrete collaborators the commands share.

use std::sync::Arc;

use tracing::{debug, error, warn};

use herald_client::HttpMetricsSink;
use herald_config::HeraldConfig;
use herald_core::HeraldError;
use herald_engine::MessagesDelegate;
use herald_storage::Database;

/// Open (and migrate) the configured database.
pub fn open_database(config: &HeraldConfig) -> Result<Arc<Database>, HeraldError> {
    Database::open_with_config(&config.storage).map(Arc::new)
}

/// The HTTP metrics sink, when metrics are enabled and an API is configured.
pub fn metrics_sink(config: &HeraldConfig) -> Option<HttpMetricsSink> {
    if !config.messages.metrics_enabled {
        debug!("metrics disabled by configuration");
        return None;
    }
    if config.api.base_url.is_none() {
        debug!("no api.base_url, metrics will not be sent");
        return None;
    }
    match HttpMetricsSink::new(&config.api) {
        Ok(sink) => Some(sink),
        Err(e) => {
            warn!(error = %e, "metrics sink unavailable");
            None
        }
    }
}

/// Logs failed checks.
pub struct LoggingDelegate;

impl MessagesDelegate for LoggingDelegate {
    fn messages_check_failed(&self, err: &HeraldError) {
        error!(error = %err, "message check failed");
    }
}
