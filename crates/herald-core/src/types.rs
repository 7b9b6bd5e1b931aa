// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and the engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Server-assigned identifier of a message (campaign).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Persisted display history: how many times each message has been presented.
pub type ShowCounts = BTreeMap<MessageId, u32>;

/// Handle to a live screen that a message can be presented onto.
///
/// Opaque to the engine; the presenter decides what it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(pub String);

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Collaborator is fully operational.
    Healthy,
    /// Collaborator is operational but experiencing issues.
    Degraded(String),
    /// Collaborator is not operational.
    Unhealthy(String),
}

/// Identifies the role a collaborator plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Fetcher,
    Presenter,
    History,
    Metrics,
    Receipts,
}

/// Metric events reported to the backend for a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// The message was displayed.
    View,
    /// The user interacted with the message.
    Interaction,
}

/// How messages governed by the external automation system are treated by
/// the ad-hoc presentation path.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AutomationPolicy {
    /// Automation-on messages never enter the queue; the trigger system owns them.
    #[default]
    Exclude,
    /// Automation-on messages are eligible while `now <= end_date`, ignoring repeat counts.
    EndDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn show_counts_serialize_with_string_keys() {
        let mut counts = ShowCounts::new();
        counts.insert(MessageId(7), 2);
        counts.insert(MessageId(42), 1);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"7":2,"42":1}"#);

        let parsed: ShowCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, counts);
    }

    #[test]
    fn metric_kind_string_forms() {
        assert_eq!(MetricKind::View.to_string(), "view");
        assert_eq!(MetricKind::from_str("interaction").unwrap(), MetricKind::Interaction);
        assert_eq!(serde_json::to_string(&MetricKind::View).unwrap(), r#""view""#);
    }

    #[test]
    fn automation_policy_defaults_to_exclude() {
        assert_eq!(AutomationPolicy::default(), AutomationPolicy::Exclude);
        assert_eq!(
            AutomationPolicy::from_str("end_date").unwrap(),
            AutomationPolicy::EndDate
        );
    }
}
