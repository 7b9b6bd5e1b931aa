// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Herald.

use thiserror::Error;

use crate::decode::DecodeError;

/// The primary error type used across collaborator traits and engine operations.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration errors (invalid values, missing required settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence errors (database open, query failure, serialization of history).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Fetching messages from the backend failed.
    #[error("fetch error: {message}")]
    Fetch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Posting a metric event failed.
    #[error("metrics error: {message}")]
    Metrics {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A backend record could not be decoded into a message.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HeraldError {
    /// Wrap any error as a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
