// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald check`: fetch messages from the backend and present them.

use std::sync::Arc;

use tracing::info;

use herald_client::HttpFetcher;
use herald_config::HeraldConfig;
use herald_core::{HeraldError, MetricsSink};
use herald_engine::{CheckTrigger, MessageCenter, PresentOutcome};
use herald_storage::SqliteHistoryStore;

use crate::collaborators::{LoggingDelegate, metrics_sink, open_database};
use crate::terminal::TerminalPresenter;

/// Run one manual check. `debug` ignores the display history.
pub async fn run_check(config: &HeraldConfig, debug: bool, plain: bool) -> Result<(), HeraldError> {
    let db = open_database(config)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.api)?);
    let presenter = Arc::new(TerminalPresenter::stdio(plain));
    let history = Arc::new(SqliteHistoryStore::new(db));
    let sink = metrics_sink(config);

    let mut messages = config.messages.clone();
    messages.debug |= debug;

    let mut builder = MessageCenter::builder(fetcher, presenter, history)
        .delegate(Arc::new(LoggingDelegate))
        .config(messages);
    if let Some(sink) = &sink {
        builder = builder.metrics_sink(Arc::new(sink.clone()) as Arc<dyn MetricsSink>);
    }
    let center = builder.build();

    let report = center.check_messages(CheckTrigger::Manual).await?;
    println!(
        "fetched {} message(s), {} to present",
        report.fetched,
        report.candidates.len()
    );

    if let Some(outcome) = report.presented().await {
        describe_outcome(&outcome);
        if matches!(outcome, PresentOutcome::Started { .. }) {
            center.queue().wait_until_idle().await;
            info!("presentation finished");
        }
    }

    if let Some(sink) = sink {
        sink.flush().await;
    }
    Ok(())
}

/// One-line summary of a presentation attempt.
pub fn describe_outcome(outcome: &PresentOutcome) {
    match outcome {
        PresentOutcome::NothingToShow => println!("nothing to show"),
        PresentOutcome::Started { batch } => println!("presenting {} message(s)", batch.len()),
        PresentOutcome::Deferred { pending, .. } => {
            println!("another batch is showing, {} message(s) deferred", pending.len());
        }
        PresentOutcome::AwaitingAnchor { .. } => println!("waiting for a screen to present on"),
    }
}
