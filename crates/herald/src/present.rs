// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `herald present`: present messages read from a local JSON file.
//!
//! The file holds the same records the backend returns, either as a
//! `{"body": [...]}` envelope, a bare array, or a single record.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use herald_config::HeraldConfig;
use herald_core::{DecodeError, HeraldError, Message, MetricsSink, decode_messages};
use herald_engine::{PresentOutcome, PresentationQueue, QueueSettings};
use herald_storage::SqliteHistoryStore;

use crate::check::describe_outcome;
use crate::collaborators::{metrics_sink, open_database};
use crate::terminal::TerminalPresenter;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageFile {
    Envelope { body: Vec<Value> },
    Records(Vec<Value>),
    Single(Map<String, Value>),
}

impl MessageFile {
    fn into_records(self) -> Vec<Value> {
        match self {
            Self::Envelope { body } => body,
            Self::Records(records) => records,
            Self::Single(record) => vec![Value::Object(record)],
        }
    }
}

/// Parse and decode a message file. Undecodable records are skipped.
pub fn parse_message_file(content: &str) -> Result<Vec<Message>, HeraldError> {
    let file: MessageFile = serde_json::from_str(content).map_err(DecodeError::from)?;
    Ok(decode_messages(file.into_records()))
}

pub async fn run_present(
    config: &HeraldConfig,
    file: &Path,
    ignore_history: bool,
    plain: bool,
) -> Result<(), HeraldError> {
    let content = std::fs::read_to_string(file).map_err(|e| {
        HeraldError::Config(format!("cannot read message file {}: {e}", file.display()))
    })?;
    let messages = parse_message_file(&content)?;
    info!(file = %file.display(), count = messages.len(), "messages loaded");

    let db = open_database(config)?;
    let sink = metrics_sink(config);
    let queue = PresentationQueue::new(
        Arc::new(TerminalPresenter::stdio(plain)),
        Arc::new(SqliteHistoryStore::new(db)),
        sink.clone().map(|s| Arc::new(s) as Arc<dyn MetricsSink>),
        QueueSettings::from(&config.messages),
    );

    let outcome = queue.present_messages(messages, ignore_history);
    describe_outcome(&outcome);
    if matches!(outcome, PresentOutcome::Started { .. }) {
        queue.wait_until_idle().await;
    }

    if let Some(sink) = sink {
        sink.flush().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::MessageId;

    const RECORD: &str = r#"{"id": 4, "content": {"type": "center", "content": "hi"}}"#;

    fn ids(messages: &[Message]) -> Vec<MessageId> {
        messages.iter().map(|m| m.id).collect()
    }

    #[test]
    fn accepts_envelope_array_and_single_record() {
        let envelope = format!(r#"{{"body": [{RECORD}]}}"#);
        assert_eq!(ids(&parse_message_file(&envelope).unwrap()), vec![MessageId(4)]);

        let array = format!("[{RECORD}, {RECORD}]");
        assert_eq!(parse_message_file(&array).unwrap().len(), 2);

        assert_eq!(ids(&parse_message_file(RECORD).unwrap()), vec![MessageId(4)]);
    }

    #[test]
    fn bad_records_are_skipped() {
        let array = format!(r#"[{RECORD}, {{"id": 5, "type": "fax"}}]"#);
        assert_eq!(ids(&parse_message_file(&array).unwrap()), vec![MessageId(4)]);
    }

    #[test]
    fn non_json_is_a_decode_error() {
        let err = parse_message_file("42").unwrap_err();
        assert!(matches!(err, HeraldError::Decode(_)), "got: {err}");
        assert!(matches!(
            parse_message_file("not json").unwrap_err(),
            HeraldError::Decode(_)
        ));
    }
}
