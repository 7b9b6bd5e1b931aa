// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`MetricsSink`] that posts each event to the metrics endpoint.
//!
//! `record` never blocks: the request runs on the current tokio runtime and
//! its outcome is only logged. Short-lived callers can [`flush`] before
//! exiting so queued requests are not cut off.
//!
//! [`flush`]: HttpMetricsSink::flush

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use herald_config::ApiConfig;
use herald_core::{
    AdapterType, HealthStatus, HeraldError, MessageId, MetricKind, MetricsSink, PluginAdapter,
};

use crate::client::ApiClient;

/// Fire-and-forget HTTP metrics.
#[derive(Debug, Clone)]
pub struct HttpMetricsSink {
    client: ApiClient,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl HttpMetricsSink {
    pub fn new(config: &ApiConfig) -> Result<Self, HeraldError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests spawned and not yet finished.
    pub fn pending(&self) -> usize {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|task| !task.is_finished());
        in_flight.len()
    }

    /// Wait for every request spawned so far.
    pub async fn flush(&self) {
        let tasks: Vec<JoinHandle<()>> = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            in_flight.drain(..).collect()
        };
        for task in tasks {
            if let Err(e) = task.await {
                debug!(error = %e, "metric task ended abnormally");
            }
        }
    }

    fn spawn(&self, metric: MetricKind, message_id: MessageId) {
        let Ok(handle) = Handle::try_current() else {
            warn!(%metric, %message_id, "no async runtime, metric dropped");
            return;
        };
        let client = self.client.clone();
        let task = handle.spawn(async move {
            if let Err(e) = client.post_metric(metric, message_id).await {
                debug!(%metric, %message_id, error = %e, "metric not delivered");
            }
        });
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|task| !task.is_finished());
        in_flight.push(task);
    }
}

#[async_trait]
impl PluginAdapter for HttpMetricsSink {
    fn name(&self) -> &str {
        "http-metrics"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Metrics
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

impl MetricsSink for HttpMetricsSink {
    fn record(&self, metric: MetricKind, message_id: MessageId) {
        self.spawn(metric, message_id);
    }
}
