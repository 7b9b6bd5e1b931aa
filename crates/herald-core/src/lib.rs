// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Herald, an in-app message selection and presentation engine.
//!
//! This crate holds the message model, backend record decoding, the shared
//! error type, and the collaborator traits the engine drives (fetcher,
//! presenter, history store, metrics sink, receipt store).

pub mod decode;
pub mod error;
pub mod message;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use decode::{DecodeError, decode_message, decode_messages};
pub use error::HeraldError;
pub use message::{
    Button, InAppMessage, LinkType, MAX_BUTTONS, Message, MessageKind, PushMessage,
    SectionTarget, Style,
};
pub use types::{
    AdapterType, Anchor, AutomationPolicy, HealthStatus, MessageId, MetricKind, ShowCounts,
};

// Re-export all collaborator traits at crate root.
pub use traits::{
    Completion, Dismissal, HistoryStore, MessageFetcher, MetricsSink, PluginAdapter, Presenter,
    ReceiptStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_with_their_category() {
        assert_eq!(
            HeraldError::Config("bad".into()).to_string(),
            "configuration error: bad"
        );
        assert_eq!(
            HeraldError::storage(std::io::Error::other("disk full")).to_string(),
            "storage error: disk full"
        );
        assert_eq!(
            HeraldError::from(DecodeError::MissingField("id")).to_string(),
            "decode error: missing required field `id`"
        );
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Fetcher,
            AdapterType::Presenter,
            AdapterType::History,
            AdapterType::Metrics,
            AdapterType::Receipts,
        ];
        for variant in &variants {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_collaborator_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_fetcher<T: MessageFetcher>() {}
        fn _assert_presenter<T: Presenter>() {}
        fn _assert_history<T: HistoryStore>() {}
        fn _assert_metrics<T: MetricsSink>() {}
        fn _assert_receipts<T: ReceiptStore>() {}
    }
}
