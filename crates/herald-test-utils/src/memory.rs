// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory history store, receipt store, and metrics sink.
//!
//! The stores can be switched into a failing mode to exercise the engine's
//! persistence error handling.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use herald_core::{
    AdapterType, HealthStatus, HeraldError, HistoryStore, MessageId, MetricKind, MetricsSink,
    PluginAdapter, ReceiptStore, ShowCounts,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn injected_failure(what: &str) -> HeraldError {
    HeraldError::storage(std::io::Error::other(format!("injected {what} failure")))
}

macro_rules! healthy_adapter {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), HeraldError> {
                Ok(())
            }
        }
    };
}

/// Display history kept in memory.
#[derive(Default)]
pub struct MemoryHistoryStore {
    counts: Mutex<ShowCounts>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(counts: ShowCounts) -> Self {
        Self {
            counts: Mutex::new(counts),
            ..Self::default()
        }
    }

    /// The current map, bypassing the failure switches.
    pub fn snapshot(&self) -> ShowCounts {
        lock(&self.counts).clone()
    }

    pub fn count(&self, id: MessageId) -> u32 {
        lock(&self.counts).get(&id).copied().unwrap_or(0)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

healthy_adapter!(MemoryHistoryStore, "memory-history", AdapterType::History);

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<ShowCounts, HeraldError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected_failure("read"));
        }
        Ok(lock(&self.counts).clone())
    }

    fn save(&self, counts: &ShowCounts) -> Result<(), HeraldError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected_failure("write"));
        }
        *lock(&self.counts) = counts.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Receipt set kept in memory.
#[derive(Default)]
pub struct MemoryReceiptStore {
    receipts: Mutex<BTreeSet<String>>,
}

impl MemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipts(&self) -> Vec<String> {
        lock(&self.receipts).iter().cloned().collect()
    }
}

healthy_adapter!(MemoryReceiptStore, "memory-receipts", AdapterType::Receipts);

impl ReceiptStore for MemoryReceiptStore {
    fn contains(&self, receipt: &str) -> Result<bool, HeraldError> {
        Ok(lock(&self.receipts).contains(receipt))
    }

    fn insert(&self, receipt: &str) -> Result<(), HeraldError> {
        lock(&self.receipts).insert(receipt.to_string());
        Ok(())
    }
}

/// Metrics sink that captures every event.
#[derive(Default)]
pub struct MockMetricsSink {
    events: Mutex<Vec<(MetricKind, MessageId)>>,
}

impl MockMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(MetricKind, MessageId)> {
        lock(&self.events).clone()
    }

    /// Ids that received a `View`, in order.
    pub fn viewed(&self) -> Vec<MessageId> {
        lock(&self.events)
            .iter()
            .filter(|(kind, _)| *kind == MetricKind::View)
            .map(|(_, id)| *id)
            .collect()
    }
}

healthy_adapter!(MockMetricsSink, "mock-metrics", AdapterType::Metrics);

impl MetricsSink for MockMetricsSink {
    fn record(&self, metric: MetricKind, message_id: MessageId) {
        lock(&self.events).push((metric, message_id));
    }
}
