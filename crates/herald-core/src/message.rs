// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message model: campaigns, in-app payloads, buttons, and push payloads.
//!
//! These are immutable value records. They are produced by
//! [`decode`](crate::decode) from backend JSON, or built directly in tests.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::MessageId;

/// Maximum number of action buttons an in-app message may carry.
pub const MAX_BUTTONS: usize = 2;

/// The kind of content a message delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum MessageKind {
    /// Rendered inside the host application by a [`Presenter`](crate::Presenter).
    InAppMessage,
    /// Delivered by the platform's notification service.
    Push,
}

/// One campaign record fetched from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Campaign name as entered in the backend.
    pub title: String,
    pub description: String,
    pub kind: MessageKind,
    /// Present iff `kind == InAppMessage`.
    pub in_app: Option<InAppMessage>,
    /// Only ever present for `kind == Push`.
    pub push: Option<PushMessage>,
    /// Batches are ordered newest first by this timestamp.
    pub created_at: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    /// Automated messages stay eligible until this instant under
    /// `AutomationPolicy::EndDate`.
    pub end_date: DateTime<Utc>,
    /// Scheduling is owned by the external automation system.
    pub automation_is_on: bool,
    /// Delay hint for the automation system.
    pub send_after_days: i64,
    /// Repeat limit; see the eligibility rules in `herald-engine`.
    pub repeat_times: i64,
    /// Opaque trigger definitions for the automation system.
    pub triggers: Option<serde_json::Value>,
}

impl Message {
    /// Returns true if this is an in-app message carrying its payload.
    pub fn is_in_app(&self) -> bool {
        self.kind == MessageKind::InAppMessage && self.in_app.is_some()
    }

    /// Panics if the message violates a content-authoring precondition.
    ///
    /// More than [`MAX_BUTTONS`] buttons is a backend bug that must surface in
    /// testing rather than be truncated at runtime.
    pub fn assert_well_formed(&self) {
        if let Some(in_app) = &self.in_app {
            assert!(
                in_app.buttons.len() <= MAX_BUTTONS,
                "message {} has {} buttons; in-app messages support at most {MAX_BUTTONS} buttons",
                self.id,
                in_app.buttons.len()
            );
        }
    }
}

/// Presentation style of an in-app message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Strip pinned to the top edge.
    BannerTop,
    /// Strip pinned to the bottom edge.
    BannerBottom,
    /// Modal card in the middle of the screen.
    #[default]
    Center,
    /// Full-screen image with optional buttons.
    FullscreenImage,
}

impl Style {
    /// Parse the backend's style string; unknown values fall back to `Center`.
    pub fn from_wire(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Rendering payload of an in-app message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InAppMessage {
    /// Mirrors the owning message id.
    pub id: MessageId,
    pub style: Style,
    /// No automatic timeout and no gesture dismissal; only buttons advance it.
    pub is_blocking: bool,
    /// Time on screen before automatic dismissal. `None` means no timeout.
    pub duration: Option<Duration>,
    pub title: Option<String>,
    /// Hex color string, e.g. `#ffffff`.
    pub title_color: Option<String>,
    pub body: String,
    pub body_color: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    pub background_color: Option<String>,
    /// At most [`MAX_BUTTONS`]; see [`Message::assert_well_formed`].
    pub buttons: Vec<Button>,
}

impl InAppMessage {
    /// The timeout a presenter should arm, if any.
    pub fn auto_dismiss_after(&self) -> Option<Duration> {
        if self.is_blocking {
            None
        } else {
            self.duration
        }
    }

    /// Whether swipe/tap/close gestures may dismiss the message.
    pub fn allows_gesture_dismissal(&self) -> bool {
        !self.is_blocking
    }
}

/// What tapping a button does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Open `link` as a URL.
    Link,
    /// Route `link` inside the host application.
    InApp,
    /// Jump to a content section, see [`SectionTarget`].
    Section,
    /// Only dismiss the message.
    #[default]
    NoAction,
}

impl LinkType {
    /// Parse the backend's link type string; unknown values mean no action.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "link" => Self::Link,
            "in_app" | "inapp" => Self::InApp,
            "section" => Self::Section,
            _ => Self::NoAction,
        }
    }
}

/// Target of a section link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionTarget {
    pub section_id: i64,
    /// Block within the section; `None` opens the section at the top.
    pub block_id: Option<i64>,
}

/// An action button of an in-app message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    /// Label shown on the button.
    pub title: String,
    pub title_color: Option<String>,
    pub background_color: Option<String>,
    /// URL or route, interpreted according to `link_type`.
    pub link: Option<String>,
    pub link_type: LinkType,
    /// Only set for `LinkType::Section`.
    pub section: Option<SectionTarget>,
}

/// Push notification payload of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Backend identifier of the notification, distinct from the message id.
    pub id: String,
    pub title: String,
    pub body: String,
    /// App icon badge number to set on delivery.
    pub badge: Option<i64>,
    /// Sound file name; `None` plays the default.
    pub sound: Option<String>,
    pub launch_image: Option<String>,
    /// Application-defined payload forwarded unchanged.
    pub custom: Option<serde_json::Value>,
    /// Whether the backend already sent the notification.
    pub sent: bool,
}
