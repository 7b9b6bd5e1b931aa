// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries, one module per table.

pub mod receipts;
pub mod settings;
