// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP collaborators for Herald: the message fetcher and the metrics sink.

pub mod client;
pub mod fetcher;
pub mod metrics;
pub mod types;

pub use client::ApiClient;
pub use fetcher::HttpFetcher;
pub use metrics::HttpMetricsSink;
pub use types::{ApiErrorResponse, MessagesEnvelope, MetricRequest};
