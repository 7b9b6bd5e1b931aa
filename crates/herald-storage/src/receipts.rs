// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed push receipt store.

use std::sync::Arc;

use async_trait::async_trait;

use herald_core::{AdapterType, HealthStatus, HeraldError, PluginAdapter, ReceiptStore};

use crate::database::Database;
use crate::queries::receipts;

#[derive(Debug, Clone)]
pub struct SqliteReceiptStore {
    db: Arc<Database>,
}

impl SqliteReceiptStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list(&self) -> Result<Vec<String>, HeraldError> {
        receipts::list_receipts(&self.db)
    }

    pub fn clear(&self) -> Result<usize, HeraldError> {
        receipts::clear_receipts(&self.db)
    }
}

#[async_trait]
impl PluginAdapter for SqliteReceiptStore {
    fn name(&self) -> &str {
        "sqlite-receipts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Receipts
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        self.db.ping()?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

impl ReceiptStore for SqliteReceiptStore {
    fn contains(&self, receipt: &str) -> Result<bool, HeraldError> {
        receipts::contains_receipt(&self.db, receipt)
    }

    fn insert(&self, receipt: &str) -> Result<(), HeraldError> {
        receipts::insert_receipt(&self.db, receipt)
    }
}
