// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value settings.

use herald_core::HeraldError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// Value stored under `key`, if any.
pub fn get_setting(db: &Database, key: &str) -> Result<Option<String>, HeraldError> {
    db.with_connection(|conn| {
        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
    })
}

/// Insert or replace the value under `key`.
pub fn set_setting(db: &Database, key: &str, value: &str) -> Result<(), HeraldError> {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![key, value],
        )?;
        Ok(())
    })
}

/// Remove `key`. Returns true if it existed.
pub fn delete_setting(db: &Database, key: &str) -> Result<bool, HeraldError> {
    db.with_connection(|conn| {
        let removed = conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(get_setting(&db, "a").unwrap(), None);

        set_setting(&db, "a", "1").unwrap();
        set_setting(&db, "a", "2").unwrap();
        assert_eq!(get_setting(&db, "a").unwrap().as_deref(), Some("2"));

        assert!(delete_setting(&db, "a").unwrap());
        assert!(!delete_setting(&db, "a").unwrap());
        assert_eq!(get_setting(&db, "a").unwrap(), None);
    }
}
