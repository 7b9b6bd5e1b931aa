// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald history`: inspect or reset the display history.

use herald_config::HeraldConfig;
use herald_core::{HeraldError, HistoryStore, ShowCounts};
use herald_storage::SqliteHistoryStore;

use crate::collaborators::open_database;

pub fn run_history_show(config: &HeraldConfig, json: bool) -> Result<(), HeraldError> {
    let store = SqliteHistoryStore::new(open_database(config)?);
    let counts = store.load()?;
    if json {
        let rendered = serde_json::to_string_pretty(&counts)
            .map_err(|e| HeraldError::Internal(format!("failed to render history: {e}")))?;
        println!("{rendered}");
    } else {
        print!("{}", format_table(&counts));
    }
    Ok(())
}

pub fn run_history_reset(config: &HeraldConfig) -> Result<(), HeraldError> {
    let store = SqliteHistoryStore::new(open_database(config)?);
    let entries = store.load().map(|counts| counts.len()).unwrap_or(0);
    store.clear()?;
    println!("display history cleared ({entries} message(s))");
    Ok(())
}

fn format_table(counts: &ShowCounts) -> String {
    if counts.is_empty() {
        return "no messages shown yet\n".to_string();
    }
    let mut table = format!("  {:<12} {}\n", "message", "shown");
    for (id, count) in counts {
        table.push_str(&format!("  {:<12} {count}\n", id.to_string()));
    }
    table
}
