// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message selection and presentation engine for Herald.
//!
//! - [`eligibility`]: which messages should be shown, and the display history.
//! - [`queue`]: one-batch-at-a-time presentation with anchor and lock waits.
//! - [`center`]: fetch-then-present orchestration.
//! - [`push`]: once-per-installation push notification metrics.
//! - [`recording`]: metrics-facade counters.

pub mod center;
pub mod eligibility;
pub mod push;
pub mod queue;
pub mod recording;

pub use center::{
    CheckReport, CheckTrigger, CollaboratorHealth, MessageCenter, MessageCenterBuilder,
    MessagesDelegate,
};
pub use eligibility::{HistoryLedger, needs_to_show, record_shown};
pub use push::{InteractionHook, PushMetrics, message_id_from_payload};
pub use queue::{PresentOutcome, PresentationQueue, QueueSettings, QueueState};
