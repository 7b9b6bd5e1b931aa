// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald push`: report metrics for a received or opened push notification.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use herald_config::HeraldConfig;
use herald_core::{DecodeError, HeraldError, MetricKind, MetricsSink};
use herald_engine::PushMetrics;
use herald_storage::SqliteReceiptStore;

use crate::collaborators::{metrics_sink, open_database};

pub async fn run_push(config: &HeraldConfig, payload: &Path, opened: bool) -> Result<(), HeraldError> {
    let content = std::fs::read_to_string(payload).map_err(|e| {
        HeraldError::Config(format!("cannot read push payload {}: {e}", payload.display()))
    })?;
    let payload: Value = serde_json::from_str(&content).map_err(DecodeError::from)?;

    let sink = metrics_sink(config).ok_or_else(|| {
        HeraldError::Config("push metrics need api.base_url and messages.metrics_enabled".into())
    })?;
    let receipts = SqliteReceiptStore::new(open_database(config)?);
    let push = PushMetrics::new(
        Arc::new(sink.clone()) as Arc<dyn MetricsSink>,
        Arc::new(receipts),
    );

    let sent = if opened {
        push.notification_opened(&payload)
    } else {
        push.notification_received(&payload)
    };
    sink.flush().await;

    println!("{}", summarize(&sent));
    Ok(())
}

fn summarize(sent: &[MetricKind]) -> String {
    if sent.is_empty() {
        return "nothing to report (already reported, or no message_id)".to_string();
    }
    let names: Vec<String> = sent.iter().map(ToString::to_string).collect();
    format!("reported {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_sent_metrics() {
        assert_eq!(
            summarize(&[MetricKind::View, MetricKind::Interaction]),
            "reported view, interaction"
        );
        assert!(summarize(&[]).starts_with("nothing to report"));
    }
}
