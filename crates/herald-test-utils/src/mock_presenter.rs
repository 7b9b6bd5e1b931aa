// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock presenter with a controllable anchor and manually driven dismissals.
//!
//! `MockPresenter` records every presentation and parks its [`Completion`]
//! until the test calls [`advance`](MockPresenter::advance) or
//! [`press_button`](MockPresenter::press_button).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use herald_core::{
    AdapterType, Anchor, Completion, HealthStatus, HeraldError, Message, MessageId,
    PluginAdapter, Presenter,
};

/// One call to [`Presenter::present`].
#[derive(Debug, Clone)]
pub struct Presentation {
    pub message: Message,
    pub anchor: Anchor,
}

/// A presenter for tests.
pub struct MockPresenter {
    anchor: Mutex<Option<Anchor>>,
    presented: Mutex<Vec<Presentation>>,
    pending: Mutex<VecDeque<Completion>>,
    anchor_queries: Mutex<usize>,
    notify: Arc<Notify>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockPresenter {
    /// A presenter whose anchor is `"main"`.
    pub fn new() -> Self {
        Self::with_anchor(Some(Anchor("main".to_string())))
    }

    /// A presenter with no live screen until [`set_anchor`](Self::set_anchor) is called.
    pub fn without_anchor() -> Self {
        Self::with_anchor(None)
    }

    fn with_anchor(anchor: Option<Anchor>) -> Self {
        Self {
            anchor: Mutex::new(anchor),
            presented: Mutex::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
            anchor_queries: Mutex::new(0),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn set_anchor(&self, anchor: Option<Anchor>) {
        *lock(&self.anchor) = anchor;
    }

    /// Ids of presented messages, in presentation order.
    pub fn presented_ids(&self) -> Vec<MessageId> {
        lock(&self.presented).iter().map(|p| p.message.id).collect()
    }

    pub fn presentations(&self) -> Vec<Presentation> {
        lock(&self.presented).clone()
    }

    pub fn presentation_count(&self) -> usize {
        lock(&self.presented).len()
    }

    /// How many times the engine asked for an anchor.
    pub fn anchor_queries(&self) -> usize {
        *lock(&self.anchor_queries)
    }

    /// Number of presentations still waiting for a dismissal.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Wait until at least `count` messages have been presented.
    pub async fn wait_for_presentations(&self, count: usize) {
        loop {
            if self.presentation_count() >= count {
                return;
            }
            self.notify.notified().await;
        }
    }

    /// Dismiss the oldest on-screen message without a button.
    ///
    /// Returns the id of the dismissed message, or `None` if nothing is showing.
    pub fn advance(&self) -> Option<MessageId> {
        let completion = self.take_completion()?;
        let id = completion.message_id();
        completion.advance();
        Some(id)
    }

    /// Press button `index` on the oldest on-screen message.
    pub fn press_button(&self, index: usize) -> Option<MessageId> {
        let completion = self.take_completion()?;
        let id = completion.message_id();
        completion.button_pressed(index);
        Some(id)
    }

    /// Take the oldest parked completion so the test can drop or fire it itself.
    pub fn take_completion(&self) -> Option<Completion> {
        lock(&self.pending).pop_front()
    }
}

impl Default for MockPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockPresenter {
    fn name(&self) -> &str {
        "mock-presenter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presenter
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

impl Presenter for MockPresenter {
    fn topmost_anchor(&self) -> Option<Anchor> {
        *lock(&self.anchor_queries) += 1;
        lock(&self.anchor).clone()
    }

    fn present(&self, message: Message, anchor: Anchor, completion: Completion) {
        lock(&self.presented).push(Presentation { message, anchor });
        lock(&self.pending).push_back(completion);
        self.notify.notify_one();
    }
}
