// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push metric receipts.

use herald_core::HeraldError;
use rusqlite::params;

use crate::database::Database;

pub fn contains_receipt(db: &Database, receipt: &str) -> Result<bool, HeraldError> {
    db.with_connection(|conn| {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM push_receipts WHERE receipt = ?1)",
            params![receipt],
            |row| row.get(0),
        )
    })
}

/// Record `receipt`; existing receipts keep their original timestamp.
pub fn insert_receipt(db: &Database, receipt: &str) -> Result<(), HeraldError> {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO push_receipts (receipt) VALUES (?1)",
            params![receipt],
        )?;
        Ok(())
    })
}

/// All receipts, oldest first.
pub fn list_receipts(db: &Database) -> Result<Vec<String>, HeraldError> {
    db.with_connection(|conn| {
        let mut stmt =
            conn.prepare("SELECT receipt FROM push_receipts ORDER BY recorded_at, receipt")?;
        let receipts = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>();
        receipts
    })
}

/// Delete every receipt. Returns how many were removed.
pub fn clear_receipts(db: &Database) -> Result<usize, HeraldError> {
    db.with_connection(|conn| conn.execute("DELETE FROM push_receipts", []))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert!(!contains_receipt(&db, "view_1").unwrap());

        insert_receipt(&db, "view_1").unwrap();
        insert_receipt(&db, "view_1").unwrap();
        insert_receipt(&db, "interaction_1").unwrap();

        assert!(contains_receipt(&db, "view_1").unwrap());
        assert_eq!(list_receipts(&db).unwrap().len(), 2);
        assert_eq!(clear_receipts(&db).unwrap(), 2);
        assert!(list_receipts(&db).unwrap().is_empty());
    }
}
