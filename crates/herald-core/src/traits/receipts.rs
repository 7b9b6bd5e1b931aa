// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of "already reported" markers for push metrics.

use crate::error::HeraldError;
use crate::traits::adapter::PluginAdapter;

/// A durable set of receipt strings such as `"view_12"`.
pub trait ReceiptStore: PluginAdapter {
    /// Returns true if the receipt was recorded before.
    fn contains(&self, receipt: &str) -> Result<bool, HeraldError>;

    /// Records the receipt. Inserting an existing receipt is a no-op.
    fn insert(&self, receipt: &str) -> Result<(), HeraldError>;
}
