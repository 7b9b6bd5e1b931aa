// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Eligibility rules and the persisted display history.
//!
//! [`needs_to_show`] and [`record_shown`] are pure; [`HistoryLedger`] binds
//! them to a [`HistoryStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use herald_core::{AutomationPolicy, HistoryStore, Message, MessageKind, ShowCounts};

/// Decide whether `message` should be presented given the display history.
///
/// - Only in-app messages carrying a payload are ever eligible.
/// - Automation-on messages follow `policy`: excluded, or eligible up to
///   `end_date` with no repeat limit.
/// - Blocking messages are always eligible.
/// - Otherwise a message is eligible while its show count is `<= repeat_times`,
///   so `repeat_times = N` allows `N + 1` presentations.
pub fn needs_to_show(
    message: &Message,
    counts: &ShowCounts,
    now: DateTime<Utc>,
    policy: AutomationPolicy,
) -> bool {
    let Some(in_app) = &message.in_app else {
        return false;
    };
    if message.kind != MessageKind::InAppMessage {
        return false;
    }

    if message.automation_is_on {
        return match policy {
            AutomationPolicy::Exclude => false,
            AutomationPolicy::EndDate => now <= message.end_date,
        };
    }

    if in_app.is_blocking {
        return true;
    }

    let shown = counts.get(&message.id).copied().unwrap_or(0);
    i64::from(shown) <= message.repeat_times
}

/// Return `counts` with the show count of `message` incremented by one.
pub fn record_shown(message: &Message, mut counts: ShowCounts) -> ShowCounts {
    let entry = counts.entry(message.id).or_insert(0);
    *entry = entry.saturating_add(1);
    counts
}

/// Display history backed by a [`HistoryStore`].
///
/// Unreadable history is treated as empty. A failed save is logged and
/// otherwise ignored; presentation never fails because of persistence.
#[derive(Clone)]
pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Current counts, or an empty map if the store cannot be read.
    pub fn counts(&self) -> ShowCounts {
        match self.store.load() {
            Ok(counts) => counts,
            Err(e) => {
                warn!(error = %e, store = self.store.name(), "display history unreadable, treating as empty");
                ShowCounts::new()
            }
        }
    }

    /// Increment and persist the count of `message`. Returns the new count.
    pub fn record_shown(&self, message: &Message) -> u32 {
        let counts = record_shown(message, self.counts());
        let shown = counts.get(&message.id).copied().unwrap_or(0);
        match self.store.save(&counts) {
            Ok(()) => debug!(message_id = %message.id, shown, "display history updated"),
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "failed to persist display history")
            }
        }
        shown
    }

    /// Remove every recorded count.
    pub fn reset(&self) -> Result<(), herald_core::HeraldError> {
        self.store.save(&ShowCounts::new())
    }
}
