// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the presentation queue.
//!
//! All tests run on a paused clock: retries fire as soon as every task is idle.

use std::sync::Arc;
use std::time::Duration;

use herald_core::{Anchor, MessageId, MetricKind};
use herald_engine::{PresentOutcome, PresentationQueue, QueueSettings, QueueState};
use herald_test_utils::{
    MemoryHistoryStore, MessageBuilder, MockMetricsSink, MockPresenter, in_app,
};

struct Harness {
    presenter: Arc<MockPresenter>,
    history: Arc<MemoryHistoryStore>,
    metrics: Arc<MockMetricsSink>,
    queue: PresentationQueue,
}

impl Harness {
    fn new() -> Self {
        Self::with_presenter(MockPresenter::new())
    }

    fn with_presenter(presenter: MockPresenter) -> Self {
        let presenter = Arc::new(presenter);
        let history = Arc::new(MemoryHistoryStore::new());
        let metrics = Arc::new(MockMetricsSink::new());
        let queue = PresentationQueue::new(
            presenter.clone(),
            history.clone(),
            Some(metrics.clone()),
            QueueSettings::default(),
        );
        Self {
            presenter,
            history,
            metrics,
            queue,
        }
    }

    /// Advance through `count` presentations, one dismissal each.
    async fn dismiss_all(&self, count: usize) {
        for shown in 1..=count {
            self.presenter.wait_for_presentations(shown).await;
            self.presenter.advance();
        }
    }
}

fn ids(raw: &[i64]) -> Vec<MessageId> {
    raw.iter().copied().map(MessageId).collect()
}

#[tokio::test(start_paused = true)]
async fn batch_is_presented_newest_first() {
    let h = Harness::new();

    let outcome = h
        .queue
        .present_messages(vec![in_app(1, 100), in_app(3, 300), in_app(2, 200)], false);
    assert_eq!(outcome, PresentOutcome::Started { batch: ids(&[3, 2, 1]) });

    h.dismiss_all(3).await;
    h.queue.wait_until_idle().await;
    assert_eq!(h.presenter.presented_ids(), ids(&[3, 2, 1]));
}

#[tokio::test(start_paused = true)]
async fn equal_timestamps_keep_input_order() {
    let h = Harness::new();

    let outcome = h
        .queue
        .present_messages(vec![in_app(5, 10), in_app(4, 10), in_app(6, 20)], false);
    assert_eq!(outcome, PresentOutcome::Started { batch: ids(&[6, 5, 4]) });
}

#[tokio::test(start_paused = true)]
async fn overlapping_calls_never_repeat_a_message() {
    let h = Harness::new();
    let a = in_app(1, 200);
    let b = in_app(2, 100);
    let c = in_app(3, 50);

    assert_eq!(
        h.queue.present_messages(vec![a.clone(), b], false),
        PresentOutcome::Started { batch: ids(&[1, 2]) }
    );
    assert_eq!(
        h.queue.present_messages(vec![a, c], true),
        PresentOutcome::Deferred {
            retry_in: Duration::from_secs(1),
            pending: ids(&[3]),
        }
    );

    h.dismiss_all(3).await;
    h.queue.wait_until_idle().await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1, 2, 3]));
}

#[tokio::test(start_paused = true)]
async fn call_made_only_of_showing_messages_is_dropped() {
    let h = Harness::new();
    h.queue.present_messages(vec![in_app(1, 0)], false);

    assert_eq!(
        h.queue.present_messages(vec![in_app(1, 0)], true),
        PresentOutcome::NothingToShow
    );
}

#[tokio::test(start_paused = true)]
async fn deferred_call_keeps_retrying_until_the_lock_clears() {
    let h = Harness::new();
    h.queue.present_messages(vec![in_app(1, 0)], false);
    h.presenter.wait_for_presentations(1).await;

    h.queue.present_messages(vec![in_app(2, 0)], false);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1]));

    h.presenter.advance();
    h.presenter.wait_for_presentations(2).await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1, 2]));
}

#[tokio::test(start_paused = true)]
async fn button_press_abandons_batch_and_releases_lock_immediately() {
    let h = Harness::new();
    h.queue
        .present_messages(vec![in_app(1, 300), in_app(2, 200), in_app(3, 100)], false);
    h.presenter.wait_for_presentations(1).await;

    assert_eq!(h.presenter.press_button(0), Some(MessageId(1)));
    assert!(!h.queue.is_showing());
    assert_eq!(h.queue.state(), QueueState::Idle);

    assert_eq!(
        h.queue.present_messages(vec![in_app(9, 0)], false),
        PresentOutcome::Started { batch: ids(&[9]) }
    );
    h.presenter.wait_for_presentations(2).await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1, 9]));
    assert_eq!(h.history.count(MessageId(2)), 0);
}

#[tokio::test(start_paused = true)]
async fn waits_for_an_anchor_before_acquiring_the_lock() {
    let h = Harness::with_presenter(MockPresenter::without_anchor());

    assert_eq!(
        h.queue.present_messages(vec![in_app(1, 0)], false),
        PresentOutcome::AwaitingAnchor {
            retry_in: Duration::from_millis(500)
        }
    );
    assert!(!h.queue.is_showing());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.presenter.presentation_count(), 0);
    assert!(h.presenter.anchor_queries() >= 4);

    h.presenter.set_anchor(Some(Anchor("late".into())));
    h.presenter.wait_for_presentations(1).await;
    assert_eq!(h.presenter.presentations()[0].anchor, Anchor("late".into()));
}

#[tokio::test(start_paused = true)]
async fn later_messages_wait_for_a_lost_anchor() {
    let h = Harness::new();
    h.queue
        .present_messages(vec![in_app(1, 20), in_app(2, 10)], false);
    h.presenter.wait_for_presentations(1).await;

    h.presenter.set_anchor(None);
    h.presenter.advance();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(h.presenter.presentation_count(), 1);
    assert!(h.queue.is_showing());
    assert_eq!(
        h.queue.state(),
        QueueState::Showing {
            batch: ids(&[1, 2]),
            index: 1
        }
    );

    // Nothing is counted for a message that has not rendered yet.
    assert_eq!(h.history.count(MessageId(2)), 0);
    assert_eq!(h.metrics.viewed(), ids(&[1]));

    h.presenter.set_anchor(Some(Anchor("back".into())));
    h.presenter.wait_for_presentations(2).await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1, 2]));
    assert_eq!(h.history.count(MessageId(2)), 1);
    assert_eq!(h.metrics.viewed(), ids(&[1, 2]));
}

#[tokio::test(start_paused = true)]
async fn history_limits_repeats_unless_ignored() {
    let h = Harness::new();
    let message = in_app(7, 0);

    h.queue.present_messages(vec![message.clone()], false);
    h.dismiss_all(1).await;
    h.queue.wait_until_idle().await;
    assert_eq!(h.history.count(MessageId(7)), 1);

    assert_eq!(
        h.queue.present_messages(vec![message.clone()], false),
        PresentOutcome::NothingToShow
    );
    assert_eq!(
        h.queue.present_messages(vec![message], true),
        PresentOutcome::Started { batch: ids(&[7]) }
    );
    h.dismiss_all(1).await;
    h.queue.wait_until_idle().await;
    assert_eq!(h.history.count(MessageId(7)), 2);
}

#[tokio::test(start_paused = true)]
async fn push_and_exhausted_messages_are_filtered() {
    let h = Harness::new();
    let push = MessageBuilder::push(1).build();
    let automated = MessageBuilder::in_app(2).automation(true).build();

    assert_eq!(
        h.queue.present_messages(vec![push, automated], false),
        PresentOutcome::NothingToShow
    );
    assert_eq!(h.presenter.anchor_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn every_presentation_reports_a_view() {
    let h = Harness::new();
    h.queue
        .present_messages(vec![in_app(1, 20), in_app(2, 10)], false);
    h.dismiss_all(2).await;
    h.queue.wait_until_idle().await;

    assert_eq!(
        h.metrics.events(),
        vec![
            (MetricKind::View, MessageId(1)),
            (MetricKind::View, MessageId(2)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dropped_completion_advances_the_batch() {
    let h = Harness::new();
    h.queue
        .present_messages(vec![in_app(1, 20), in_app(2, 10)], false);
    h.presenter.wait_for_presentations(1).await;

    drop(h.presenter.take_completion());
    h.presenter.wait_for_presentations(2).await;
    drop(h.presenter.take_completion());
    h.queue.wait_until_idle().await;
    assert_eq!(h.presenter.presented_ids(), ids(&[1, 2]));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_every_transition() {
    let h = Harness::new();
    let mut rx = h.queue.subscribe();

    h.queue.present_messages(vec![in_app(1, 0)], false);
    rx.changed().await.unwrap();
    assert_eq!(
        *rx.borrow_and_update(),
        QueueState::Showing {
            batch: ids(&[1]),
            index: 0
        }
    );

    h.dismiss_all(1).await;
    rx.wait_for(|s| *s == QueueState::Idle).await.unwrap();
}

#[tokio::test(start_paused = true)]
#[should_panic(expected = "in-app messages support at most 2 buttons")]
async fn three_buttons_is_a_fatal_configuration_error() {
    let h = Harness::new();
    let message = MessageBuilder::in_app(1).buttons(3).build();
    h.queue.present_messages(vec![message], false);
}

#[tokio::test(start_paused = true)]
async fn two_buttons_are_accepted() {
    let h = Harness::new();
    let message = MessageBuilder::in_app(1).buttons(2).build();
    assert_eq!(
        h.queue.present_messages(vec![message], false),
        PresentOutcome::Started { batch: ids(&[1]) }
    );
}

#[tokio::test(start_paused = true)]
#[should_panic(expected = "in-app messages support at most 2 buttons")]
async fn three_buttons_panic_even_while_a_batch_is_showing() {
    let h = Harness::new();
    h.queue.present_messages(vec![in_app(1, 0)], false);
    h.presenter.wait_for_presentations(1).await;
    assert!(h.queue.is_showing());

    let message = MessageBuilder::in_app(2).buttons(3).build();
    h.queue.present_messages(vec![message], false);
}

#[tokio::test(start_paused = true)]
async fn state_is_idle_once_the_lock_is_released() {
    let h = Harness::new();
    h.queue.present_messages(vec![in_app(1, 0)], false);
    h.dismiss_all(1).await;
    h.queue.wait_until_idle().await;

    assert!(!h.queue.is_showing());
    assert_eq!(h.queue.state(), QueueState::Idle);
    assert_eq!(
        h.queue.present_messages(vec![in_app(2, 0)], false),
        PresentOutcome::Started { batch: ids(&[2]) }
    );
    assert_eq!(
        h.queue.state(),
        QueueState::Showing {
            batch: ids(&[2]),
            index: 0
        }
    );
}
