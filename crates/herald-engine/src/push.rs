// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! View and interaction metrics for push notifications.
//!
//! Each `(metric, message)` pair is reported at most once per installation.
//! Receipts such as `"view_12"` are written before the metric is sent.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use herald_core::{MessageId, MetricKind, MetricsSink, ReceiptStore};

/// Called with the raw payload whenever the user interacts with a notification.
pub type InteractionHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Reports push notification metrics through a [`MetricsSink`].
#[derive(Clone)]
pub struct PushMetrics {
    sink: Arc<dyn MetricsSink>,
    receipts: Arc<dyn ReceiptStore>,
    on_interaction: Option<InteractionHook>,
}

/// The `message_id` of a push payload, if it carries an integer one.
pub fn message_id_from_payload(payload: &Value) -> Option<MessageId> {
    payload.get("message_id")?.as_i64().map(MessageId)
}

fn receipt_key(metric: MetricKind, id: MessageId) -> String {
    format!("{metric}_{id}")
}

impl PushMetrics {
    pub fn new(sink: Arc<dyn MetricsSink>, receipts: Arc<dyn ReceiptStore>) -> Self {
        Self {
            sink,
            receipts,
            on_interaction: None,
        }
    }

    pub fn with_interaction_hook(mut self, hook: InteractionHook) -> Self {
        self.on_interaction = Some(hook);
        self
    }

    /// A notification was delivered or shown.
    pub fn notification_received(&self, payload: &Value) -> Vec<MetricKind> {
        self.handle_notification(payload, MetricKind::View)
    }

    /// The user opened or acted on a notification.
    pub fn notification_opened(&self, payload: &Value) -> Vec<MetricKind> {
        self.handle_notification(payload, MetricKind::Interaction)
    }

    /// Report `metric` for the message referenced by `payload`.
    ///
    /// An interaction on a message whose view was never reported reports the
    /// view first. Returns the metrics actually sent, in order.
    pub fn handle_notification(&self, payload: &Value, metric: MetricKind) -> Vec<MetricKind> {
        if metric == MetricKind::Interaction {
            if let Some(hook) = &self.on_interaction {
                hook(payload);
            }
        }

        let Some(id) = message_id_from_payload(payload) else {
            debug!("push payload has no integer message_id, ignoring");
            return Vec::new();
        };

        let mut sent = Vec::new();
        if metric == MetricKind::Interaction && self.send_once(MetricKind::View, id) {
            sent.push(MetricKind::View);
        }
        if self.send_once(metric, id) {
            sent.push(metric);
        }
        sent
    }

    fn send_once(&self, metric: MetricKind, id: MessageId) -> bool {
        let key = receipt_key(metric, id);
        match self.receipts.contains(&key) {
            Ok(true) => return false,
            Ok(false) => {}
            Err(e) => warn!(receipt = %key, error = %e, "receipt lookup failed, sending anyway"),
        }
        if let Err(e) = self.receipts.insert(&key) {
            warn!(receipt = %key, error = %e, "failed to store push receipt");
        }
        debug!(%metric, message_id = %id, "reporting push metric");
        self.sink.record(metric, id);
        true
    }
}
