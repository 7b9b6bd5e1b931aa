// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message fetcher returning canned results.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use herald_core::{
    AdapterType, HealthStatus, HeraldError, Message, MessageFetcher, PluginAdapter,
};

/// A fetcher that returns the same messages (or the same failure) on every call.
pub struct MockFetcher {
    response: Mutex<Result<Vec<Message>, String>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            response: Mutex::new(Ok(messages)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with `HeraldError::Fetch { message }`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(Err(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_messages(&self, messages: Vec<Message>) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = Ok(messages);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockFetcher {
    fn name(&self) -> &str {
        "mock-fetcher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Fetcher
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

#[async_trait]
impl MessageFetcher for MockFetcher {
    async fn fetch_messages(&self) -> Result<Vec<Message>, HeraldError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap_or_else(|e| e.into_inner());
        match &*response {
            Ok(messages) => Ok(messages.clone()),
            Err(message) => Err(HeraldError::Fetch {
                message: message.clone(),
                source: None,
            }),
        }
    }
}
