// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Herald - in-app message selection and presentation.
//!
//! Binary entry point: drives the engine against the messages API and a
//! terminal presenter.

mod check;
mod collaborators;
mod doctor;
mod history;
mod present;
mod push;
mod terminal;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use herald_config::{ConfigError, HeraldConfig};

/// Herald - in-app message selection and presentation.
#[derive(Parser, Debug)]
#[command(name = "herald", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch messages from the API and present the eligible ones.
    Check {
        /// Ignore the display history.
        #[arg(long)]
        debug: bool,
    },
    /// Present messages from a local JSON file.
    Present {
        file: PathBuf,
        /// Present messages even if they reached their repeat limit.
        #[arg(long)]
        ignore_history: bool,
    },
    /// Inspect or reset the display history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Report metrics for a push notification payload.
    Push {
        payload: PathBuf,
        /// The notification was opened rather than just received.
        #[arg(long)]
        opened: bool,
    },
    /// Run diagnostic checks.
    Doctor,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// Print how often each message was shown.
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Forget every display.
    Reset,
}

fn load_config(path: Option<&Path>) -> Result<HeraldConfig, Vec<ConfigError>> {
    match path {
        Some(path) => herald_config::load_and_validate_path(path),
        None => herald_config::load_and_validate(),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("herald={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            herald_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);
    herald_engine::recording::register_metrics();
    tracing::debug!(app = %config.app.name, "config loaded");

    let result = match cli.command {
        Commands::Check { debug } => check::run_check(&config, debug, cli.plain).await,
        Commands::Present {
            file,
            ignore_history,
        } => present::run_present(&config, &file, ignore_history, cli.plain).await,
        Commands::History { action } => match action {
            HistoryAction::Show { json } => history::run_history_show(&config, json),
            HistoryAction::Reset => history::run_history_reset(&config),
        },
        Commands::Push { payload, opened } => push::run_push(&config, &payload, opened).await,
        Commands::Doctor => match doctor::run_doctor(&config, cli.config.as_deref(), cli.plain).await {
            Ok(0) => Ok(()),
            Ok(_) => std::process::exit(1),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("herald: {e}");
        std::process::exit(1);
    }
}
