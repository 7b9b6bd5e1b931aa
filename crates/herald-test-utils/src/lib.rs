// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Herald.
//!
//! Mock collaborators and message fixtures for fast, deterministic tests
//! without a backend, a database, or a screen.
//!
//! # Components
//!
//! - [`MockPresenter`] - Presenter with a controllable anchor and test-driven dismissals
//! - [`MockFetcher`] - Fetcher with canned messages or a canned failure
//! - [`MemoryHistoryStore`], [`MemoryReceiptStore`], [`MockMetricsSink`] - In-memory stores
//! - [`MessageBuilder`] - Message fixtures

pub mod fixtures;
pub mod memory;
pub mod mock_fetcher;
pub mod mock_presenter;

pub use fixtures::{MessageBuilder, in_app, ts};
pub use memory::{MemoryHistoryStore, MemoryReceiptStore, MockMetricsSink};
pub use mock_fetcher::MockFetcher;
pub use mock_presenter::{MockPresenter, Presentation};
