// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! One connection per [`Database`], guarded by a mutex. Every query goes
//! through [`Database::with_connection`].

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, info};

use herald_config::StorageConfig;
use herald_core::HeraldError;

use crate::migrations::run_migrations;

/// A migrated SQLite database.
pub struct Database {
    conn: Mutex<Connection>,
    path: String,
}

impl Database {
    /// Open the database described by `config`.
    pub fn open_with_config(config: &StorageConfig) -> Result<Self, HeraldError> {
        Self::open(&config.database_path, config.wal_mode)
    }

    /// Open (creating if needed) the database at `path` and run migrations.
    ///
    /// Parent directories are created. With `wal_mode` the journal is
    /// switched to WAL.
    pub fn open(path: &str, wal_mode: bool) -> Result<Self, HeraldError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(HeraldError::storage)?;
            }
        }

        let conn = Connection::open(path).map_err(HeraldError::storage)?;
        let db = Self::from_connection(conn, path, wal_mode)?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// A private in-memory database, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, HeraldError> {
        let conn = Connection::open_in_memory().map_err(HeraldError::storage)?;
        Self::from_connection(conn, ":memory:", false)
    }

    fn from_connection(mut conn: Connection, path: &str, wal_mode: bool) -> Result<Self, HeraldError> {
        if wal_mode {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .map_err(HeraldError::storage)?;
            debug!(path, journal_mode = %mode, "journal mode set");
        }
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(HeraldError::storage)?;

        run_migrations(&mut conn)?;
        debug!(path, "migrations applied");

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, HeraldError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| HeraldError::Internal("database mutex poisoned".into()))?;
        f(&mut conn).map_err(HeraldError::storage)
    }

    /// `SELECT 1` round trip.
    pub fn ping(&self) -> Result<(), HeraldError> {
        self.with_connection(|conn| conn.execute_batch("SELECT 1;"))
    }

    /// Fold the WAL back into the main database file.
    pub fn checkpoint(&self) -> Result<(), HeraldError> {
        self.with_connection(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))?;
        debug!(path = %self.path, "WAL checkpoint complete");
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}
