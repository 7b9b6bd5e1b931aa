// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed display history.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use herald_core::{
    AdapterType, HealthStatus, HeraldError, HistoryStore, PluginAdapter, ShowCounts,
};

use crate::database::Database;
use crate::queries::settings;

/// Settings key the history map is stored under.
pub const HISTORY_KEY: &str = "messages.shownCount";

/// Stores the show-count map as one JSON object, e.g. `{"12": 2}`.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    db: Arc<Database>,
}

impl SqliteHistoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Delete the stored history.
    pub fn clear(&self) -> Result<(), HeraldError> {
        settings::delete_setting(&self.db, HISTORY_KEY)?;
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteHistoryStore {
    fn name(&self) -> &str {
        "sqlite-history"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::History
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        self.db.ping()?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        self.db.checkpoint()
    }
}

impl HistoryStore for SqliteHistoryStore {
    /// A value that is not a JSON count map is reported as a storage error.
    fn load(&self) -> Result<ShowCounts, HeraldError> {
        match settings::get_setting(&self.db, HISTORY_KEY)? {
            None => Ok(ShowCounts::new()),
            Some(json) => serde_json::from_str(&json).map_err(HeraldError::storage),
        }
    }

    fn save(&self, counts: &ShowCounts) -> Result<(), HeraldError> {
        let json = serde_json::to_string(counts).map_err(HeraldError::storage)?;
        settings::set_setting(&self.db, HISTORY_KEY, &json)?;
        debug!(entries = counts.len(), "display history saved");
        Ok(())
    }
}
