// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`MessageFetcher`] backed by the messages API.

use async_trait::async_trait;

use herald_config::ApiConfig;
use herald_core::{
    AdapterType, HealthStatus, HeraldError, Message, MessageFetcher, PluginAdapter,
};

use crate::client::ApiClient;

/// Fetches messages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ApiClient,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self, HeraldError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl PluginAdapter for HttpFetcher {
    fn name(&self) -> &str {
        "http-fetcher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Fetcher
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        // Configuration was validated at construction; reachability is only
        // known after a fetch.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}

#[async_trait]
impl MessageFetcher for HttpFetcher {
    async fn fetch_messages(&self) -> Result<Vec<Message>, HeraldError> {
        self.client.fetch_messages().await
    }
}
