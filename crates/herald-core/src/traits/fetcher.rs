// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetcher trait for retrieving campaign messages from the backend.

use async_trait::async_trait;

use crate::error::HeraldError;
use crate::message::Message;
use crate::traits::adapter::PluginAdapter;

/// Source of candidate messages.
///
/// Retry and backoff policy belong to the implementation; the engine only
/// consumes the success payload.
#[async_trait]
pub trait MessageFetcher: PluginAdapter {
    /// Fetches the current list of messages for this installation.
    async fn fetch_messages(&self) -> Result<Vec<Message>, HeraldError>;
}
