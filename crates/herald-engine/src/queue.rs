// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The presentation queue.
//!
//! At most one batch of in-app messages is on screen at a time. A batch holds
//! the queue lock from acceptance until its last message is dismissed, or
//! until the user presses a button, which abandons the rest of the batch.
//!
//! Nothing here blocks the caller. Waiting for the lock or for a live anchor
//! is done by re-invoking [`PresentationQueue::present_messages`] from a
//! spawned task after a delay; the batch itself runs on its own task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use herald_config::MessagesConfig;
use herald_core::{
    Anchor, AutomationPolicy, Completion, Dismissal, HistoryStore, Message, MessageId, MetricKind,
    MetricsSink, Presenter,
};

use crate::eligibility::{HistoryLedger, needs_to_show};
use crate::recording;

/// Timing and policy knobs of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSettings {
    /// Delay before retrying while another batch holds the lock.
    pub lock_retry: Duration,
    /// Delay between anchor polls.
    pub anchor_retry: Duration,
    pub automation: AutomationPolicy,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            lock_retry: Duration::from_secs(1),
            anchor_retry: Duration::from_millis(500),
            automation: AutomationPolicy::default(),
        }
    }
}

impl From<&MessagesConfig> for QueueSettings {
    fn from(config: &MessagesConfig) -> Self {
        Self {
            lock_retry: config.lock_retry(),
            anchor_retry: config.anchor_retry(),
            automation: config.automation,
        }
    }
}

/// Observable state of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    /// `batch[index]` is on screen (or waiting for an anchor).
    Showing { batch: Vec<MessageId>, index: usize },
}

/// What a call to [`PresentationQueue::present_messages`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    /// No candidate survived filtering; the queue is untouched.
    NothingToShow,
    /// Another batch is showing; `pending` will be retried after `retry_in`.
    Deferred {
        retry_in: Duration,
        pending: Vec<MessageId>,
    },
    /// No live anchor yet; the call will be retried after `retry_in`.
    AwaitingAnchor { retry_in: Duration },
    /// The lock was acquired and `batch` is being presented in this order.
    Started { batch: Vec<MessageId> },
}

struct ActiveBatch {
    id: u64,
    messages: Vec<MessageId>,
    index: usize,
}

struct Inner {
    presenter: Arc<dyn Presenter>,
    ledger: HistoryLedger,
    metrics: Option<Arc<dyn MetricsSink>>,
    settings: QueueSettings,
    showing: Mutex<Option<ActiveBatch>>,
    next_batch: AtomicU64,
    state: watch::Sender<QueueState>,
}

/// Handle to the presentation queue. Clones share the same lock.
#[derive(Clone)]
pub struct PresentationQueue {
    inner: Arc<Inner>,
}

impl PresentationQueue {
    /// `metrics` receives a `View` for every presented message; pass `None`
    /// to disable metric reporting.
    pub fn new(
        presenter: Arc<dyn Presenter>,
        history: Arc<dyn HistoryStore>,
        metrics: Option<Arc<dyn MetricsSink>>,
        settings: QueueSettings,
    ) -> Self {
        let (state, _) = watch::channel(QueueState::Idle);
        Self {
            inner: Arc::new(Inner {
                presenter,
                ledger: HistoryLedger::new(history),
                metrics,
                settings,
                showing: Mutex::new(None),
                next_batch: AtomicU64::new(1),
                state,
            }),
        }
    }

    pub fn settings(&self) -> QueueSettings {
        self.inner.settings
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.inner.ledger
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueueState {
        self.inner.state.borrow().clone()
    }

    /// True while a batch holds the lock.
    pub fn is_showing(&self) -> bool {
        self.lock_showing().is_some()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<QueueState> {
        self.inner.state.subscribe()
    }

    /// Resolves once no batch holds the lock.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|state| *state == QueueState::Idle).await;
    }

    /// Filter, order, and present `candidates` as one batch.
    ///
    /// With `ignore_history` every in-app candidate is presented regardless
    /// of its display history. Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// If any candidate has more than two buttons. The check runs before the
    /// lock is consulted, so it never moves onto a retry task.
    pub fn present_messages(&self, candidates: Vec<Message>, ignore_history: bool) -> PresentOutcome {
        for message in &candidates {
            message.assert_well_formed();
        }

        let settings = self.inner.settings;
        let mut showing = self.lock_showing();

        if let Some(active) = showing.as_ref() {
            let remaining: Vec<Message> = candidates
                .into_iter()
                .filter(|m| !active.messages.contains(&m.id))
                .collect();
            drop(showing);

            if remaining.is_empty() {
                debug!("all candidates belong to the batch on screen");
                return PresentOutcome::NothingToShow;
            }
            let pending = ids(&remaining);
            debug!(?pending, retry_in = ?settings.lock_retry, "queue busy, deferring");
            recording::record_deferred("lock");
            self.schedule(settings.lock_retry, remaining, ignore_history);
            return PresentOutcome::Deferred {
                retry_in: settings.lock_retry,
                pending,
            };
        }

        let counts = if ignore_history {
            None
        } else {
            Some(self.inner.ledger.counts())
        };
        let now = Utc::now();
        let mut accepted: Vec<Message> = candidates
            .into_iter()
            .filter(|m| m.is_in_app())
            .filter(|m| {
                counts
                    .as_ref()
                    .is_none_or(|c| needs_to_show(m, c, now, settings.automation))
            })
            .collect();

        if accepted.is_empty() {
            debug!("no eligible in-app messages");
            return PresentOutcome::NothingToShow;
        }

        accepted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let Some(anchor) = self.inner.presenter.topmost_anchor() else {
            drop(showing);
            debug!(retry_in = ?settings.anchor_retry, "no live anchor, retrying");
            recording::record_deferred("anchor");
            self.schedule(settings.anchor_retry, accepted, ignore_history);
            return PresentOutcome::AwaitingAnchor {
                retry_in: settings.anchor_retry,
            };
        };

        let batch = ids(&accepted);
        let batch_id = self.inner.next_batch.fetch_add(1, Ordering::Relaxed);
        *showing = Some(ActiveBatch {
            id: batch_id,
            messages: batch.clone(),
            index: 0,
        });
        // Published under the lock so a concurrent release cannot overwrite it.
        self.inner.state.send_replace(QueueState::Showing {
            batch: batch.clone(),
            index: 0,
        });
        drop(showing);

        recording::record_batch_started();
        info!(batch = ?batch, "presenting batch");

        let queue = self.clone();
        tokio::spawn(async move { queue.run_batch(batch_id, accepted, anchor).await });

        PresentOutcome::Started { batch }
    }

    fn schedule(&self, delay: Duration, messages: Vec<Message>, ignore_history: bool) {
        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.present_messages(messages, ignore_history);
        });
    }

    async fn run_batch(self, batch_id: u64, messages: Vec<Message>, first_anchor: Anchor) {
        let total = messages.len();
        let mut anchor = Some(first_anchor);

        for (index, message) in messages.into_iter().enumerate() {
            self.set_index(batch_id, index);
            let anchor = match anchor.take() {
                Some(anchor) => anchor,
                None => self.wait_for_anchor().await,
            };

            let id = message.id;
            let shown = self.inner.ledger.record_shown(&message);
            if let Some(sink) = &self.inner.metrics {
                sink.record(MetricKind::View, id);
            }
            if let Some(in_app) = &message.in_app {
                recording::record_presented(in_app.style);
            }
            debug!(message_id = %id, index, shown, "presenting message");

            let (tx, rx) = oneshot::channel();
            let is_last = index + 1 == total;
            let queue = self.clone();
            let completion = Completion::new(id, move |dismissal| {
                // Release before the runner wakes so the next call sees an idle queue.
                if is_last || matches!(dismissal, Dismissal::ButtonPressed { .. }) {
                    queue.release(batch_id);
                }
                let _ = tx.send(dismissal);
            });
            self.inner.presenter.present(message, anchor, completion);

            match rx.await {
                Ok(Dismissal::Advance) => {}
                Ok(Dismissal::ButtonPressed { index: button }) => {
                    let skipped = total - index - 1;
                    info!(message_id = %id, button, skipped, "button pressed, batch abandoned");
                    recording::record_batch_abandoned();
                    return;
                }
                Err(_) => warn!(message_id = %id, "completion vanished without a signal"),
            }
        }

        self.release(batch_id);
    }

    async fn wait_for_anchor(&self) -> Anchor {
        loop {
            if let Some(anchor) = self.inner.presenter.topmost_anchor() {
                return anchor;
            }
            tokio::time::sleep(self.inner.settings.anchor_retry).await;
        }
    }

    fn set_index(&self, batch_id: u64, index: usize) {
        let mut showing = self.lock_showing();
        if let Some(active) = showing.as_mut().filter(|b| b.id == batch_id) {
            active.index = index;
            self.inner.state.send_replace(QueueState::Showing {
                batch: active.messages.clone(),
                index,
            });
        }
    }

    /// Clears the lock if `batch_id` still holds it.
    fn release(&self, batch_id: u64) {
        let mut showing = self.lock_showing();
        if showing.as_ref().is_some_and(|b| b.id == batch_id) {
            *showing = None;
            self.inner.state.send_replace(QueueState::Idle);
            drop(showing);
            debug!(batch_id, "queue released");
        }
    }

    fn lock_showing(&self) -> MutexGuard<'_, Option<ActiveBatch>> {
        self.inner
            .showing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for PresentationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationQueue")
            .field("state", &self.state())
            .field("settings", &self.inner.settings)
            .finish()
    }
}

fn ids(messages: &[Message]) -> Vec<MessageId> {
    messages.iter().map(|m| m.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_test_utils::{MemoryHistoryStore, MockPresenter, in_app};

    fn queue(presenter: Arc<MockPresenter>) -> PresentationQueue {
        PresentationQueue::new(
            presenter,
            Arc::new(MemoryHistoryStore::new()),
            None,
            QueueSettings::default(),
        )
    }

    #[test]
    fn settings_follow_config() {
        let config = MessagesConfig {
            lock_retry_ms: 2_000,
            anchor_retry_ms: 50,
            automation: AutomationPolicy::EndDate,
            ..MessagesConfig::default()
        };
        let settings = QueueSettings::from(&config);
        assert_eq!(settings.lock_retry, Duration::from_secs(2));
        assert_eq!(settings.anchor_retry, Duration::from_millis(50));
        assert_eq!(settings.automation, AutomationPolicy::EndDate);
    }

    #[tokio::test]
    async fn empty_candidates_leave_queue_idle() {
        let presenter = Arc::new(MockPresenter::new());
        let queue = queue(presenter.clone());

        assert_eq!(
            queue.present_messages(Vec::new(), false),
            PresentOutcome::NothingToShow
        );
        assert!(!queue.is_showing());
        assert_eq!(queue.state(), QueueState::Idle);
        assert_eq!(presenter.anchor_queries(), 0);
    }

    #[tokio::test]
    async fn state_tracks_index_through_the_batch() {
        let presenter = Arc::new(MockPresenter::new());
        let queue = queue(presenter.clone());

        let outcome = queue.present_messages(vec![in_app(1, 10), in_app(2, 20)], false);
        assert_eq!(
            outcome,
            PresentOutcome::Started {
                batch: vec![MessageId(2), MessageId(1)]
            }
        );

        presenter.wait_for_presentations(1).await;
        assert_eq!(
            queue.state(),
            QueueState::Showing {
                batch: vec![MessageId(2), MessageId(1)],
                index: 0
            }
        );

        presenter.advance();
        presenter.wait_for_presentations(2).await;
        assert_eq!(
            queue.state(),
            QueueState::Showing {
                batch: vec![MessageId(2), MessageId(1)],
                index: 1
            }
        );

        presenter.advance();
        queue.wait_until_idle().await;
        assert!(!queue.is_showing());
    }
}
