// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the messages API.

use serde::{Deserialize, Serialize};

use herald_core::{MessageId, MetricKind};

/// `GET /messages` response: `{"body": [record, ...]}`.
#[derive(Debug, Deserialize)]
pub struct MessagesEnvelope {
    #[serde(default)]
    pub body: Vec<serde_json::Value>,
}

/// `POST /metrics` body. The message id is sent as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRequest {
    pub metric: MetricKind,
    pub message_id: String,
}

impl MetricRequest {
    pub fn new(metric: MetricKind, message_id: MessageId) -> Self {
        Self {
            metric,
            message_id: message_id.to_string(),
        }
    }
}

/// Error body the backend returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub status_code: Option<i64>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_request_wire_shape() {
        let body = serde_json::to_value(MetricRequest::new(MetricKind::Interaction, MessageId(12)))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"metric": "interaction", "message_id": "12"})
        );
    }

    #[test]
    fn envelope_defaults_to_empty() {
        let envelope: MessagesEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.body.is_empty());
    }
}
