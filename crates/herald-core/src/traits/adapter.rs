// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every collaborator implements.

use async_trait::async_trait;

use crate::error::HeraldError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health, and lifecycle shared by all collaborators.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this collaborator instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this collaborator.
    fn version(&self) -> semver::Version;

    /// Returns the role this collaborator plays.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the current status.
    async fn health_check(&self) -> Result<HealthStatus, HeraldError>;

    /// Gracefully shuts down, releasing any held resources.
    async fn shutdown(&self) -> Result<(), HeraldError>;
}
