// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message fixtures.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use herald_core::{
    Button, InAppMessage, LinkType, Message, MessageId, MessageKind, PushMessage, Style,
};

/// Builder for [`Message`] values with test-friendly defaults.
///
/// In-app messages default to a centered, non-blocking message created at
/// unix time 0, live from 0 until year 2100, shown at most once
/// (`repeat_times = 0`).
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: Message,
}

/// UTC timestamp from unix seconds.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

const YEAR_2100: i64 = 4_102_444_800;

impl MessageBuilder {
    pub fn in_app(id: i64) -> Self {
        let id = MessageId(id);
        Self {
            message: Message {
                id,
                title: format!("Message {id}"),
                description: String::new(),
                kind: MessageKind::InAppMessage,
                in_app: Some(InAppMessage {
                    id,
                    style: Style::Center,
                    is_blocking: false,
                    duration: Some(Duration::from_secs(5)),
                    title: Some(format!("Title {id}")),
                    title_color: None,
                    body: format!("Body {id}"),
                    body_color: None,
                    image: None,
                    background_color: None,
                    buttons: Vec::new(),
                }),
                push: None,
                created_at: ts(0),
                start_date: ts(0),
                end_date: ts(YEAR_2100),
                automation_is_on: false,
                send_after_days: 0,
                repeat_times: 0,
                triggers: None,
            },
        }
    }

    pub fn push(id: i64) -> Self {
        let mut builder = Self::in_app(id);
        builder.message.kind = MessageKind::Push;
        builder.message.in_app = None;
        builder.message.push = Some(PushMessage {
            id: format!("push-{id}"),
            title: format!("Push {id}"),
            body: "push body".to_string(),
            ..PushMessage::default()
        });
        builder
    }

    pub fn created_at(mut self, secs: i64) -> Self {
        self.message.created_at = ts(secs);
        self
    }

    pub fn end_date(mut self, secs: i64) -> Self {
        self.message.end_date = ts(secs);
        self
    }

    pub fn repeat_times(mut self, n: i64) -> Self {
        self.message.repeat_times = n;
        self
    }

    pub fn automation(mut self, on: bool) -> Self {
        self.message.automation_is_on = on;
        self
    }

    pub fn blocking(mut self, blocking: bool) -> Self {
        if let Some(in_app) = self.message.in_app.as_mut() {
            in_app.is_blocking = blocking;
        }
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        if let Some(in_app) = self.message.in_app.as_mut() {
            in_app.style = style;
        }
        self
    }

    pub fn duration(mut self, duration: Option<Duration>) -> Self {
        if let Some(in_app) = self.message.in_app.as_mut() {
            in_app.duration = duration;
        }
        self
    }

    /// Gives the message `count` no-action buttons labelled "Button 1", "Button 2", ...
    pub fn buttons(mut self, count: usize) -> Self {
        if let Some(in_app) = self.message.in_app.as_mut() {
            in_app.buttons = (1..=count)
                .map(|n| Button {
                    title: format!("Button {n}"),
                    title_color: None,
                    background_color: None,
                    link: None,
                    link_type: LinkType::NoAction,
                    section: None,
                })
                .collect();
        }
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// Shorthand for a default in-app message created at `created_at`.
pub fn in_app(id: i64, created_at: i64) -> Message {
    MessageBuilder::in_app(id).created_at(created_at).build()
}
