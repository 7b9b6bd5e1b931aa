// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of per-message display counts.

use crate::error::HeraldError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ShowCounts;

/// Synchronous key-value persistence of the display history.
///
/// `save(load())` must leave the stored map unchanged, and `load()` after
/// `save(m)` must return a map equal to `m`.
pub trait HistoryStore: PluginAdapter {
    /// Reads the full history map. A store with nothing saved returns an empty map.
    fn load(&self) -> Result<ShowCounts, HeraldError>;

    /// Replaces the stored history map.
    fn save(&self, counts: &ShowCounts) -> Result<(), HeraldError>;
}
