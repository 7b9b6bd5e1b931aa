// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The engine drives everything outside its own decision logic through these
//! traits. All of them extend the [`PluginAdapter`] base trait.

pub mod adapter;
pub mod fetcher;
pub mod history;
pub mod metrics;
pub mod presenter;
pub mod receipts;

pub use adapter::PluginAdapter;
pub use fetcher::MessageFetcher;
pub use history::HistoryStore;
pub use metrics::MetricsSink;
pub use presenter::{Completion, Dismissal, Presenter};
pub use receipts::ReceiptStore;
