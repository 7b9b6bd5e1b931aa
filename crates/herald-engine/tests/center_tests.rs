// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the message center.

use std::sync::{Arc, Mutex};

use herald_config::MessagesConfig;
use herald_core::{AdapterType, AutomationPolicy, HeraldError, MessageId, ShowCounts};
use herald_engine::{CheckTrigger, MessageCenter, MessagesDelegate, PresentOutcome};
use herald_test_utils::{
    MemoryHistoryStore, MessageBuilder, MockFetcher, MockMetricsSink, MockPresenter, in_app,
};

#[derive(Default)]
struct RecordingDelegate {
    failures: Mutex<Vec<String>>,
}

impl MessagesDelegate for RecordingDelegate {
    fn messages_check_failed(&self, error: &HeraldError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

fn build_center(
    fetcher: MockFetcher,
    config: MessagesConfig,
) -> (MessageCenter, Arc<MockPresenter>, Arc<MemoryHistoryStore>) {
    let presenter = Arc::new(MockPresenter::new());
    let history = Arc::new(MemoryHistoryStore::new());
    let center = MessageCenter::builder(Arc::new(fetcher), presenter.clone(), history.clone())
        .metrics_sink(Arc::new(MockMetricsSink::new()))
        .config(config)
        .build();
    (center, presenter, history)
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_notifies_delegate_and_skips_queue() {
    let presenter = Arc::new(MockPresenter::new());
    let delegate = Arc::new(RecordingDelegate::default());
    let center = MessageCenter::builder(
        Arc::new(MockFetcher::failing("backend down")),
        presenter.clone(),
        Arc::new(MemoryHistoryStore::new()),
    )
    .delegate(delegate.clone())
    .build();

    let err = center
        .check_messages(CheckTrigger::Manual)
        .await
        .expect_err("fetch should fail");
    assert!(matches!(err, HeraldError::Fetch { .. }));
    assert_eq!(
        *delegate.failures.lock().unwrap(),
        vec!["fetch error: backend down".to_string()]
    );
    assert_eq!(presenter.anchor_queries(), 0);
    assert!(!center.queue().is_showing());
}

#[tokio::test(start_paused = true)]
async fn check_hands_in_app_messages_to_the_queue_after_the_delay() {
    let fetcher = MockFetcher::with_messages(vec![
        in_app(1, 10),
        MessageBuilder::push(2).build(),
        MessageBuilder::in_app(3).automation(true).build(),
        in_app(4, 40),
    ]);
    let (center, presenter, _) = build_center(fetcher, MessagesConfig::default());

    let report = center.check_messages(CheckTrigger::Manual).await.unwrap();
    assert_eq!(report.trigger, CheckTrigger::Manual);
    assert_eq!(report.fetched, 4);
    assert_eq!(report.candidates, vec![MessageId(1), MessageId(4)]);
    assert_eq!(presenter.presentation_count(), 0);

    let started = tokio::time::Instant::now();
    let outcome = report.presented().await;
    assert!(started.elapsed() >= std::time::Duration::from_secs(1));
    assert_eq!(
        outcome,
        Some(PresentOutcome::Started {
            batch: vec![MessageId(4), MessageId(1)]
        })
    );
}

#[tokio::test(start_paused = true)]
async fn end_date_policy_lets_automated_messages_through() {
    let fetcher = MockFetcher::with_messages(vec![MessageBuilder::in_app(3).automation(true).build()]);
    let config = MessagesConfig {
        automation: AutomationPolicy::EndDate,
        ..MessagesConfig::default()
    };
    let (center, _, _) = build_center(fetcher, config);

    let report = center.check_messages(CheckTrigger::Manual).await.unwrap();
    assert_eq!(report.candidates, vec![MessageId(3)]);
    assert_eq!(
        report.presented().await,
        Some(PresentOutcome::Started {
            batch: vec![MessageId(3)]
        })
    );
}

#[tokio::test(start_paused = true)]
async fn empty_fetch_schedules_nothing() {
    let (center, _, _) = build_center(MockFetcher::with_messages(Vec::new()), MessagesConfig::default());
    let report = center.check_messages(CheckTrigger::Foreground).await.unwrap();
    assert_eq!(report.fetched, 0);
    assert_eq!(report.presented().await, None);
}

#[tokio::test(start_paused = true)]
async fn debug_mode_ignores_display_history() {
    let mut seen = ShowCounts::new();
    seen.insert(MessageId(1), 5);
    let presenter = Arc::new(MockPresenter::new());
    let center = MessageCenter::builder(
        Arc::new(MockFetcher::with_messages(vec![in_app(1, 0)])),
        presenter.clone(),
        Arc::new(MemoryHistoryStore::with_counts(seen)),
    )
    .config(MessagesConfig {
        debug: true,
        ..MessagesConfig::default()
    })
    .build();

    let report = center.check_messages(CheckTrigger::Manual).await.unwrap();
    assert!(matches!(
        report.presented().await,
        Some(PresentOutcome::Started { .. })
    ));
    presenter.wait_for_presentations(1).await;
}

#[tokio::test(start_paused = true)]
async fn startup_check_respects_config() {
    let disabled = MessagesConfig {
        check_at_startup: false,
        ..MessagesConfig::default()
    };
    let (center, _, _) = build_center(MockFetcher::with_messages(Vec::new()), disabled);
    assert!(center.start().is_none());

    let (center, _, _) = center_with_startup();
    let report = center
        .start()
        .expect("startup check enabled")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.trigger, CheckTrigger::Startup);
}

fn center_with_startup() -> (MessageCenter, Arc<MockPresenter>, Arc<MemoryHistoryStore>) {
    build_center(
        MockFetcher::with_messages(vec![in_app(1, 0)]),
        MessagesConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn foreground_check_presents_messages() {
    let (center, presenter, history) = center_with_startup();

    let report = center.on_foreground().await.unwrap().unwrap();
    assert_eq!(report.trigger, CheckTrigger::Foreground);
    presenter.wait_for_presentations(1).await;
    presenter.advance();
    center.queue().wait_until_idle().await;
    assert_eq!(history.count(MessageId(1)), 1);

    // Shown once already, so a second foreground check finds nothing new.
    let report = center.on_foreground().await.unwrap().unwrap();
    assert_eq!(report.presented().await, Some(PresentOutcome::NothingToShow));
}

#[tokio::test]
async fn health_covers_every_collaborator() {
    let (center, _, _) = build_center(MockFetcher::with_messages(Vec::new()), MessagesConfig::default());
    let kinds: Vec<AdapterType> = center.health().await.iter().map(|h| h.adapter_type).collect();
    assert_eq!(
        kinds,
        vec![
            AdapterType::Fetcher,
            AdapterType::Presenter,
            AdapterType::History,
            AdapterType::Metrics,
        ]
    );

    let quiet = MessagesConfig {
        metrics_enabled: false,
        ..MessagesConfig::default()
    };
    let (center, _, _) = build_center(MockFetcher::with_messages(Vec::new()), quiet);
    assert_eq!(center.health().await.len(), 3);
}

#[tokio::test(start_paused = true)]
#[should_panic(expected = "in-app messages support at most 2 buttons")]
async fn check_panics_on_too_many_buttons_before_scheduling() {
    let fetcher = MockFetcher::with_messages(vec![MessageBuilder::in_app(5).buttons(3).build()]);
    let (center, _, _) = build_center(fetcher, MessagesConfig::default());
    let _ = center.check_messages(CheckTrigger::Manual).await;
}

#[tokio::test(start_paused = true)]
async fn foreground_handle_carries_the_button_panic() {
    let fetcher = MockFetcher::with_messages(vec![MessageBuilder::in_app(5).buttons(3).build()]);
    let (center, presenter, _) = build_center(fetcher, MessagesConfig::default());

    let err = center.on_foreground().await.expect_err("check should panic");
    assert!(err.is_panic());
    assert_eq!(presenter.presentation_count(), 0);
}
