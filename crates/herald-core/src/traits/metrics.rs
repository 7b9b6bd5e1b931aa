// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink for message metric events (views, interactions).

use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageId, MetricKind};

/// Fire-and-forget reporting of metric events.
///
/// Implementations must not block the caller and must swallow their own
/// failures.
pub trait MetricsSink: PluginAdapter {
    /// Records one metric event for a message.
    fn record(&self, metric: MetricKind, message_id: MessageId);
}
