// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of backend JSON records into [`Message`] values.
//!
//! The backend schema is described by private `Raw*` structs; [`decode_message`]
//! is the single fallible conversion into the typed model. Optional keys use
//! the same defaults the backend documents (empty strings, `false`, `0`).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::message::{
    Button, InAppMessage, LinkType, Message, MessageKind, PushMessage, SectionTarget, Style,
};
use crate::types::MessageId;

/// Reasons a backend record cannot become a [`Message`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The record does not match the expected JSON shape.
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    /// A required key is absent or null.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The `type` key holds a value that is neither in-app nor push.
    #[error("unknown message type `{0}`")]
    UnknownKind(String),

    /// An in-app message arrived without its `content` payload.
    #[error("in-app message {0} has no content")]
    MissingContent(MessageId),

    /// A timestamp cannot be represented.
    #[error("field `{field}` holds an out-of-range timestamp {value}")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    id: Option<i64>,
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<Value>,
    created_at: Option<i64>,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
    automation: Option<bool>,
    send_after_days: Option<i64>,
    repeat: Option<i64>,
    triggers: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawInApp {
    id: Option<i64>,
    #[serde(rename = "type")]
    style: Option<String>,
    is_blocking: Option<bool>,
    duration: Option<f64>,
    title: Option<String>,
    title_color: Option<String>,
    content: Option<String>,
    content_color: Option<String>,
    background_color: Option<String>,
    image: Option<String>,
    cta_text: Option<String>,
    cta_text_color: Option<String>,
    cta_background_color: Option<String>,
    cta_action: Option<Value>,
    cta_action_type: Option<String>,
    cta2_text: Option<String>,
    cta2_text_color: Option<String>,
    cta2_background_color: Option<String>,
    cta2_action: Option<Value>,
    cta2_action_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPush {
    id: Option<String>,
    payload: Option<RawPushPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPushPayload {
    title: Option<String>,
    body: Option<String>,
    sent: Option<bool>,
    badge: Option<i64>,
    sound: Option<String>,
    #[serde(rename = "launch-image")]
    launch_image: Option<String>,
    custom: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    section_id: Option<i64>,
    block_id: Option<i64>,
}

/// Decode one backend record.
pub fn decode_message(value: Value) -> Result<Message, DecodeError> {
    let raw: RawMessage = serde_json::from_value(value)?;
    let id = MessageId(raw.id.ok_or(DecodeError::MissingField("id"))?);

    let kind = match raw.kind.as_deref() {
        None | Some("inApp") | Some("in_app") | Some("message") => MessageKind::InAppMessage,
        Some("push") => MessageKind::Push,
        Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
    };

    let (in_app, push) = match kind {
        MessageKind::InAppMessage => {
            let content = raw.content.ok_or(DecodeError::MissingContent(id))?;
            (Some(decode_in_app(id, content)?), None)
        }
        MessageKind::Push => {
            let push = raw.content.map(decode_push).transpose()?;
            (None, push)
        }
    };

    Ok(Message {
        id,
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        kind,
        in_app,
        push,
        created_at: timestamp("created_at", raw.created_at)?,
        start_date: timestamp("starts_at", raw.starts_at)?,
        end_date: timestamp("ends_at", raw.ends_at)?,
        automation_is_on: raw.automation.unwrap_or(false),
        send_after_days: raw.send_after_days.unwrap_or(0),
        repeat_times: raw.repeat.unwrap_or(0),
        triggers: raw.triggers,
    })
}

/// Decode a batch of records, skipping (and logging) the ones that fail.
pub fn decode_messages(values: Vec<Value>) -> Vec<Message> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match decode_message(value) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(index, error = %e, "skipping undecodable message record");
                None
            }
        })
        .collect()
}

fn decode_in_app(message_id: MessageId, content: Value) -> Result<InAppMessage, DecodeError> {
    let raw: RawInApp = serde_json::from_value(content)?;

    let mut buttons = Vec::new();
    if let Some(button) = decode_button(
        raw.cta_text,
        raw.cta_text_color,
        raw.cta_background_color,
        raw.cta_action,
        raw.cta_action_type,
    ) {
        buttons.push(button);
    }
    if let Some(button) = decode_button(
        raw.cta2_text,
        raw.cta2_text_color,
        raw.cta2_background_color,
        raw.cta2_action,
        raw.cta2_action_type,
    ) {
        buttons.push(button);
    }

    Ok(InAppMessage {
        id: raw.id.map(MessageId).unwrap_or(message_id),
        style: raw.style.as_deref().map(Style::from_wire).unwrap_or_default(),
        is_blocking: raw.is_blocking.unwrap_or(false),
        duration: raw.duration.and_then(duration_from_seconds),
        title: raw.title,
        title_color: raw.title_color,
        body: raw.content.unwrap_or_default(),
        body_color: raw.content_color,
        image: raw.image,
        background_color: raw.background_color,
        buttons,
    })
}

/// A button exists only when both its text and its action type are present.
fn decode_button(
    title: Option<String>,
    title_color: Option<String>,
    background_color: Option<String>,
    action: Option<Value>,
    action_type: Option<String>,
) -> Option<Button> {
    let title = title?;
    let link_type = LinkType::from_wire(&action_type?);
    let section = if link_type == LinkType::Section {
        action.as_ref().and_then(section_target)
    } else {
        None
    };
    let link = match action {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Some(Button {
        title,
        title_color,
        background_color,
        link,
        link_type,
        section,
    })
}

/// Section actions are an integer, a numeric string, or a JSON object string.
fn section_target(action: &Value) -> Option<SectionTarget> {
    match action {
        Value::Number(n) => n.as_i64().map(|section_id| SectionTarget {
            section_id,
            block_id: None,
        }),
        Value::String(s) => {
            if let Ok(section_id) = s.trim().parse::<i64>() {
                return Some(SectionTarget {
                    section_id,
                    block_id: None,
                });
            }
            let raw: RawSection = serde_json::from_str(s).ok()?;
            Some(SectionTarget {
                section_id: raw.section_id?,
                block_id: raw.block_id,
            })
        }
        _ => None,
    }
}

fn decode_push(content: Value) -> Result<PushMessage, DecodeError> {
    let raw: RawPush = serde_json::from_value(content)?;
    let payload = raw.payload.unwrap_or_default();
    Ok(PushMessage {
        id: raw.id.unwrap_or_default(),
        title: payload.title.unwrap_or_default(),
        body: payload.body.unwrap_or_default(),
        badge: payload.badge,
        sound: payload.sound,
        launch_image: payload.launch_image,
        custom: payload.custom,
        sent: payload.sent.unwrap_or(false),
    })
}

/// `-1` (or any non-positive value) is the backend's "no timeout" sentinel.
fn duration_from_seconds(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}

fn timestamp(field: &'static str, value: Option<i64>) -> Result<DateTime<Utc>, DecodeError> {
    let value = value.unwrap_or(0);
    DateTime::from_timestamp(value, 0).ok_or(DecodeError::InvalidTimestamp { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn in_app_record() -> Value {
        json!({
            "id": 12,
            "title": "Spring sale",
            "description": "banner campaign",
            "type": "inApp",
            "created_at": 1_700_000_000,
            "starts_at": 1_700_000_000,
            "ends_at": 1_800_000_000,
            "automation": false,
            "send_after_days": 0,
            "repeat": 2,
            "content": {
                "id": 12,
                "type": "banner_top",
                "is_blocking": false,
                "duration": 5,
                "title": "Hello",
                "title_color": "#FF0000",
                "content": "Body text",
                "cta_text": "Open",
                "cta_action": "https://example.com",
                "cta_action_type": "link",
                "cta2_text": "Go to section",
                "cta2_action": "{\"section_id\": 4, \"block_id\": 9}",
                "cta2_action_type": "section"
            }
        })
    }

    #[test]
    fn decodes_full_in_app_record() {
        let message = decode_message(in_app_record()).unwrap();
        assert_eq!(message.id, MessageId(12));
        assert_eq!(message.kind, MessageKind::InAppMessage);
        assert_eq!(message.repeat_times, 2);
        assert_eq!(message.created_at.timestamp(), 1_700_000_000);

        let in_app = message.in_app.unwrap();
        assert_eq!(in_app.style, Style::BannerTop);
        assert_eq!(in_app.duration, Some(Duration::from_secs(5)));
        assert_eq!(in_app.body, "Body text");
        assert_eq!(in_app.buttons.len(), 2);
        assert_eq!(in_app.buttons[0].link_type, LinkType::Link);
        assert_eq!(in_app.buttons[0].link.as_deref(), Some("https://example.com"));
        assert_eq!(
            in_app.buttons[1].section,
            Some(SectionTarget {
                section_id: 4,
                block_id: Some(9)
            })
        );
    }

    #[test]
    fn minus_one_duration_means_no_timeout() {
        let mut record = in_app_record();
        record["content"]["duration"] = json!(-1);
        let message = decode_message(record).unwrap();
        assert_eq!(message.in_app.unwrap().duration, None);
    }

    #[test]
    fn null_duration_means_no_timeout() {
        let mut record = in_app_record();
        record["content"]["duration"] = Value::Null;
        let message = decode_message(record).unwrap();
        assert_eq!(message.in_app.unwrap().duration, None);
    }

    #[test]
    fn button_requires_text_and_action_type() {
        let mut record = in_app_record();
        record["content"]["cta2_action_type"] = Value::Null;
        let message = decode_message(record).unwrap();
        assert_eq!(message.in_app.unwrap().buttons.len(), 1);
    }

    #[test]
    fn numeric_section_action() {
        let mut record = in_app_record();
        record["content"]["cta2_action"] = json!("31");
        let message = decode_message(record).unwrap();
        let section = message.in_app.unwrap().buttons[1].section.unwrap();
        assert_eq!(section.section_id, 31);
        assert_eq!(section.block_id, None);
    }

    #[test]
    fn in_app_payload_id_defaults_to_message_id() {
        let mut record = in_app_record();
        record["content"].as_object_mut().unwrap().remove("id");
        let message = decode_message(record).unwrap();
        assert_eq!(message.in_app.unwrap().id, MessageId(12));
    }

    #[test]
    fn missing_id_is_rejected() {
        let mut record = in_app_record();
        record.as_object_mut().unwrap().remove("id");
        assert!(matches!(
            decode_message(record),
            Err(DecodeError::MissingField("id"))
        ));
    }

    #[test]
    fn in_app_without_content_is_rejected() {
        let mut record = in_app_record();
        record.as_object_mut().unwrap().remove("content");
        assert!(matches!(
            decode_message(record),
            Err(DecodeError::MissingContent(MessageId(12)))
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut record = in_app_record();
        record["type"] = json!("carrier_pigeon");
        assert!(matches!(
            decode_message(record),
            Err(DecodeError::UnknownKind(_))
        ));
    }

    #[test]
    fn push_record_has_no_in_app_payload() {
        let record = json!({
            "id": 99,
            "type": "push",
            "content": {
                "id": "push-99",
                "payload": {
                    "title": "Ping",
                    "body": "You have news",
                    "badge": 3,
                    "launch-image": "splash.png",
                    "sent": true
                }
            }
        });
        let message = decode_message(record).unwrap();
        assert_eq!(message.kind, MessageKind::Push);
        assert!(message.in_app.is_none());
        let push = message.push.unwrap();
        assert_eq!(push.title, "Ping");
        assert_eq!(push.badge, Some(3));
        assert_eq!(push.launch_image.as_deref(), Some("splash.png"));
        assert!(push.sent);
    }

    #[test]
    fn batch_decoding_skips_bad_records() {
        let messages = decode_messages(vec![in_app_record(), json!({"title": "no id"})]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, MessageId(12));
    }
}
