// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message center: fetches campaigns and feeds the presentation queue.

use std::sync::Arc;

use strum::Display;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use herald_config::MessagesConfig;
use herald_core::{
    AdapterType, AutomationPolicy, HealthStatus, HeraldError, HistoryStore, Message, MessageFetcher,
    MessageId, MetricsSink, PluginAdapter, Presenter,
};

use crate::queue::{PresentOutcome, PresentationQueue, QueueSettings};

/// What prompted a message check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CheckTrigger {
    Startup,
    Foreground,
    Manual,
}

/// Receives notice of failed checks.
pub trait MessagesDelegate: Send + Sync {
    fn messages_check_failed(&self, error: &HeraldError);
}

/// Result of a successful fetch.
#[derive(Debug)]
pub struct CheckReport {
    pub trigger: CheckTrigger,
    /// Records returned by the fetcher.
    pub fetched: usize,
    /// In-app messages handed to the queue, in fetch order.
    pub candidates: Vec<MessageId>,
    presentation: Option<JoinHandle<PresentOutcome>>,
}

impl CheckReport {
    /// Wait for the delayed presentation attempt.
    ///
    /// `None` if there was nothing to hand to the queue. A panic on the
    /// presentation task is resumed here.
    pub async fn presented(self) -> Option<PresentOutcome> {
        let handle = self.presentation?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => None,
        }
    }
}

/// Health of one collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorHealth {
    pub name: String,
    pub adapter_type: AdapterType,
    pub status: HealthStatus,
}

/// Fetch-then-present orchestration over a shared [`PresentationQueue`].
#[derive(Clone)]
pub struct MessageCenter {
    fetcher: Arc<dyn MessageFetcher>,
    presenter: Arc<dyn Presenter>,
    history: Arc<dyn HistoryStore>,
    metrics: Option<Arc<dyn MetricsSink>>,
    delegate: Option<Arc<dyn MessagesDelegate>>,
    queue: PresentationQueue,
    config: MessagesConfig,
}

pub struct MessageCenterBuilder {
    fetcher: Arc<dyn MessageFetcher>,
    presenter: Arc<dyn Presenter>,
    history: Arc<dyn HistoryStore>,
    metrics: Option<Arc<dyn MetricsSink>>,
    delegate: Option<Arc<dyn MessagesDelegate>>,
    config: MessagesConfig,
}

impl MessageCenterBuilder {
    pub fn metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    pub fn delegate(mut self, delegate: Arc<dyn MessagesDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn config(mut self, config: MessagesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> MessageCenter {
        let metrics = self.metrics.filter(|_| self.config.metrics_enabled);
        let queue = PresentationQueue::new(
            Arc::clone(&self.presenter),
            Arc::clone(&self.history),
            metrics.clone(),
            QueueSettings::from(&self.config),
        );
        MessageCenter {
            fetcher: self.fetcher,
            presenter: self.presenter,
            history: self.history,
            metrics,
            delegate: self.delegate,
            queue,
            config: self.config,
        }
    }
}

impl MessageCenter {
    pub fn builder(
        fetcher: Arc<dyn MessageFetcher>,
        presenter: Arc<dyn Presenter>,
        history: Arc<dyn HistoryStore>,
    ) -> MessageCenterBuilder {
        MessageCenterBuilder {
            fetcher,
            presenter,
            history,
            metrics: None,
            delegate: None,
            config: MessagesConfig::default(),
        }
    }

    pub fn queue(&self) -> &PresentationQueue {
        &self.queue
    }

    /// Run the startup check if `check_at_startup` is set.
    pub fn start(&self) -> Option<JoinHandle<Result<CheckReport, HeraldError>>> {
        if !self.config.check_at_startup {
            debug!("startup check disabled");
            return None;
        }
        Some(self.spawn_check(CheckTrigger::Startup))
    }

    /// The host application came to the foreground.
    pub fn on_foreground(&self) -> JoinHandle<Result<CheckReport, HeraldError>> {
        self.spawn_check(CheckTrigger::Foreground)
    }

    fn spawn_check(&self, trigger: CheckTrigger) -> JoinHandle<Result<CheckReport, HeraldError>> {
        let center = self.clone();
        tokio::spawn(async move { center.check_messages(trigger).await })
    }

    /// Fetch messages and schedule their presentation.
    ///
    /// On fetch failure the delegate is notified and the queue is not
    /// touched. On success the presentation attempt runs after
    /// `presentation_delay` on its own task.
    ///
    /// # Panics
    ///
    /// If a fetched in-app message has more than two buttons. Under
    /// [`start`](Self::start) and [`on_foreground`](Self::on_foreground) the
    /// panic is carried by the returned handle's `JoinError`.
    pub async fn check_messages(&self, trigger: CheckTrigger) -> Result<CheckReport, HeraldError> {
        info!(%trigger, fetcher = self.fetcher.name(), "checking messages");

        let messages = match self.fetcher.fetch_messages().await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(%trigger, error = %e, "message check failed");
                if let Some(delegate) = &self.delegate {
                    delegate.messages_check_failed(&e);
                }
                return Err(e);
            }
        };

        let fetched = messages.len();
        let candidates: Vec<Message> = messages
            .into_iter()
            .filter(|m| m.is_in_app())
            .filter(|m| {
                !(m.automation_is_on && self.config.automation == AutomationPolicy::Exclude)
            })
            .collect();
        // Surface malformed content here rather than on the delayed task.
        for message in &candidates {
            message.assert_well_formed();
        }
        let ids: Vec<MessageId> = candidates.iter().map(|m| m.id).collect();
        debug!(fetched, candidates = ids.len(), "messages fetched");

        let presentation = if candidates.is_empty() {
            None
        } else {
            let queue = self.queue.clone();
            let delay = self.config.presentation_delay();
            let debug = self.config.debug;
            Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                queue.present_messages(candidates, debug)
            }))
        };

        Ok(CheckReport {
            trigger,
            fetched,
            candidates: ids,
            presentation,
        })
    }

    /// Present `messages` right away, honoring the `debug` flag.
    pub fn present_messages(&self, messages: Vec<Message>) -> PresentOutcome {
        self.queue.present_messages(messages, self.config.debug)
    }

    /// Health of every collaborator.
    pub async fn health(&self) -> Vec<CollaboratorHealth> {
        let mut report = vec![
            probe(&*self.fetcher).await,
            probe(&*self.presenter).await,
            probe(&*self.history).await,
        ];
        if let Some(metrics) = &self.metrics {
            report.push(probe(&**metrics).await);
        }
        report
    }
}

async fn probe<A: PluginAdapter + ?Sized>(adapter: &A) -> CollaboratorHealth {
    let status = match adapter.health_check().await {
        Ok(status) => status,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };
    CollaboratorHealth {
        name: adapter.name().to_string(),
        adapter_type: adapter.adapter_type(),
        status,
    }
}
