// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local counters for the presentation queue.
//!
//! Uses the metrics-rs facade, so whichever recorder the host installs
//! collects them. Without a recorder these calls are no-ops.

use metrics::describe_counter;

use herald_core::Style;

/// Register all Herald metric descriptions.
///
/// Call once after the host installs its recorder.
pub fn register_metrics() {
    describe_counter!(
        "herald_messages_presented_total",
        "In-app messages handed to the presenter"
    );
    describe_counter!(
        "herald_batches_started_total",
        "Presentation batches that acquired the queue lock"
    );
    describe_counter!(
        "herald_batches_abandoned_total",
        "Batches cut short by a button press"
    );
    describe_counter!(
        "herald_presentations_deferred_total",
        "present_messages calls rescheduled for later"
    );
}

pub fn record_presented(style: Style) {
    metrics::counter!("herald_messages_presented_total", "style" => style.to_string())
        .increment(1);
}

pub fn record_batch_started() {
    metrics::counter!("herald_batches_started_total").increment(1);
}

pub fn record_batch_abandoned() {
    metrics::counter!("herald_batches_abandoned_total").increment(1);
}

/// `reason` is `"lock"` or `"anchor"`.
pub fn record_deferred(reason: &'static str) {
    metrics::counter!("herald_presentations_deferred_total", "reason" => reason).increment(1);
}
