// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Herald.
//!
//! A WAL-mode database with embedded migrations holding the display history
//! (a JSON map in the `settings` table) and push metric receipts.

pub mod database;
pub mod history;
pub mod migrations;
pub mod queries;
pub mod receipts;

pub use database::Database;
pub use history::{HISTORY_KEY, SqliteHistoryStore};
pub use receipts::SqliteReceiptStore;
