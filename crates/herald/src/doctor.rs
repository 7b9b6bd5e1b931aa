// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald doctor` command implementation.
//!
//! Checks configuration, the local database, and the messages API, then
//! prints one line per check.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use herald_client::HttpFetcher;
use herald_config::HeraldConfig;
use herald_core::{HeraldError, HistoryStore, MessageFetcher};
use herald_storage::SqliteHistoryStore;

use crate::collaborators::open_database;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run every check and print the report. Returns the number of failures.
pub async fn run_doctor(
    config: &HeraldConfig,
    config_path: Option<&Path>,
    plain: bool,
) -> Result<usize, HeraldError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![
        check_config(config_path),
        check_database(config),
        check_api(config).await,
    ];

    println!();
    println!("  herald doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let failures = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warnings = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    if failures + warnings == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failures + warnings;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    }
    println!();

    Ok(failures)
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<14} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<14} {} ({duration_ms}ms)", result.name, result.message)
    }
}

/// Configuration is reloaded so the check reports on what is on disk now.
fn check_config(path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match path {
        Some(path) => herald_config::load_and_validate_path(path),
        None => herald_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

fn check_database(config: &HeraldConfig) -> CheckResult {
    let start = Instant::now();
    let path = &config.storage.database_path;
    let db = match open_database(config) {
        Ok(db) => db,
        Err(e) => return CheckResult::new("Database", CheckStatus::Fail, format!("open failed: {e}"), start),
    };
    if let Err(e) = db.ping() {
        return CheckResult::new("Database", CheckStatus::Fail, format!("query failed: {e}"), start);
    }
    match SqliteHistoryStore::new(db).load() {
        Ok(counts) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            format!("{path} ({} message(s) in history)", counts.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("history unreadable, will be treated as empty: {e}"),
            start,
        ),
    }
}

async fn check_api(config: &HeraldConfig) -> CheckResult {
    let start = Instant::now();
    if config.api.base_url.is_none() {
        return CheckResult::new("Messages API", CheckStatus::Warn, "api.base_url not set", start);
    }
    if config.api.api_token.is_none() {
        return CheckResult::new("Messages API", CheckStatus::Warn, "api.api_token not set", start);
    }
    let fetcher = match HttpFetcher::new(&config.api) {
        Ok(fetcher) => fetcher,
        Err(e) => return CheckResult::new("Messages API", CheckStatus::Fail, e.to_string(), start),
    };
    match fetcher.fetch_messages().await {
        Ok(messages) => CheckResult::new(
            "Messages API",
            CheckStatus::Pass,
            format!("reachable ({} message(s))", messages.len()),
            start,
        ),
        Err(e) => CheckResult::new("Messages API", CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(dir: &tempfile::TempDir) -> HeraldConfig {
        let mut config = HeraldConfig::default();
        config.storage.database_path = dir.path().join("herald.db").display().to_string();
        config
    }

    #[test]
    fn plain_lines_carry_status_tags() {
        let result = CheckResult {
            name: "Database",
            status: CheckStatus::Warn,
            message: "slow".into(),
            duration: Duration::from_millis(3),
        };
        let line = format_line(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("slow (3ms)"));
    }

    #[test]
    fn database_check_passes_on_a_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_database(&temp_config(&dir));
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
        assert!(result.message.contains("0 message(s)"));
    }

    #[tokio::test]
    async fn api_check_warns_without_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_api(&temp_config(&dir)).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.message, "api.base_url not set");
    }
}
