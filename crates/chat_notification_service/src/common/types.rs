/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::tools::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumString;

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct UserId(pub String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ChatRoomId(pub String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct MessageId(pub String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DeviceToken(pub String);

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq, PartialOrd)]
pub struct Timestamp(pub DateTime<Utc>);

/// Message type tag as stored on the chat-message document. Open set, so
/// unrecognized tags round-trip through `Other` without loss.
#[derive(Debug, Clone, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Voice,
    #[strum(default)]
    Other(String),
}

impl MessageType {
    pub fn from_tag(tag: &str) -> Self {
        tag.parse()
            .unwrap_or_else(|_| MessageType::Other(tag.to_string()))
    }

    /// Raw wire tag, preserved verbatim for `Other`.
    pub fn as_tag(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Video => "video",
            MessageType::Voice => "voice",
            MessageType::Other(tag) => tag,
        }
    }

    /// Display body shown in the notification tray. Media messages carry no
    /// renderable content, so they map to a fixed placeholder; everything
    /// else shows the message text verbatim.
    pub fn notification_body(&self, message: &str) -> String {
        match self {
            MessageType::Image => "📷 Sent a photo".to_string(),
            MessageType::Video => "🎥 Sent a video".to_string(),
            MessageType::Voice => "🎤 Sent a voice message".to_string(),
            MessageType::Text | MessageType::Other(_) => message.to_string(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Wire form of a newly created message document, as delivered by the
/// database trigger. `senderID` is the canonical external field name.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDoc {
    pub receiver_id: String,
    #[serde(rename = "senderID")]
    pub sender_id: String,
    pub sender_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub sender_photo_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub local_id: Option<String>,
}

/// Resolved form of the triggering document with all optional fields
/// defaulted. Defaulting happens here once, at the parse boundary.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub receiver_id: UserId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub message: String,
    pub message_type: MessageType,
    pub sender_photo_url: String,
    pub timestamp: Timestamp,
    pub local_id: String,
}

impl ChatMessage {
    pub fn from_document(doc: ChatMessageDoc, received_at: DateTime<Utc>) -> Self {
        ChatMessage {
            receiver_id: UserId(doc.receiver_id),
            sender_id: UserId(doc.sender_id),
            sender_name: doc.sender_name,
            message: doc.message,
            message_type: MessageType::from_tag(doc.message_type.as_deref().unwrap_or_default()),
            sender_photo_url: doc.sender_photo_url.unwrap_or_default(),
            timestamp: Timestamp(doc.timestamp.unwrap_or(received_at)),
            local_id: doc.local_id.unwrap_or_default(),
        }
    }
}

/// Routing context from the trigger path
/// (`Chat_rooms/{chatRoomId}/Messages/{messageId}`).
#[derive(Debug, Clone)]
pub struct TriggerContext {
    pub chat_room_id: ChatRoomId,
    pub message_id: MessageId,
}

/// Recipient record from the `Users` collection. `token` is `None` when the
/// user has no registered device or the stored token is empty.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserRecord {
    pub token: Option<DeviceToken>,
}

/// Structured result of one dispatch attempt. Converted to "log and return"
/// only at the HTTP boundary, never propagated to the triggering platform.
#[derive(Debug)]
pub enum DispatchOutcome {
    Delivered,
    NoUserFound,
    NoDeviceToken,
    Failed(AppError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn message_type_parses_known_tags() {
        assert_eq!(MessageType::from_tag("text"), MessageType::Text);
        assert_eq!(MessageType::from_tag("image"), MessageType::Image);
        assert_eq!(MessageType::from_tag("video"), MessageType::Video);
        assert_eq!(MessageType::from_tag("voice"), MessageType::Voice);
    }

    #[test]
    fn message_type_keeps_unknown_tags() {
        assert_eq!(
            MessageType::from_tag("sticker"),
            MessageType::Other("sticker".to_string())
        );
        assert_eq!(MessageType::from_tag("sticker").to_string(), "sticker");
        assert_eq!(MessageType::from_tag("voice").to_string(), "voice");
        // Missing tags resolve to Other("") and must stay empty on the wire.
        assert_eq!(MessageType::from_tag("").to_string(), "");
    }

    #[test]
    fn media_types_map_to_placeholder_bodies() {
        assert_eq!(
            MessageType::Image.notification_body("ignored"),
            "📷 Sent a photo"
        );
        assert_eq!(
            MessageType::Video.notification_body("ignored"),
            "🎥 Sent a video"
        );
        assert_eq!(
            MessageType::Voice.notification_body("ignored"),
            "🎤 Sent a voice message"
        );
    }

    #[test]
    fn other_types_keep_message_verbatim() {
        assert_eq!(MessageType::Text.notification_body("hi"), "hi");
        assert_eq!(MessageType::Text.notification_body(""), "");
        assert_eq!(
            MessageType::Other("sticker".to_string()).notification_body("hello"),
            "hello"
        );
    }

    #[test]
    fn document_deserializes_with_sender_id_casing() {
        let doc: ChatMessageDoc = serde_json::from_value(serde_json::json!({
            "receiverId": "u2",
            "senderID": "u1",
            "senderName": "Alice",
            "message": "hi",
            "type": "text"
        }))
        .unwrap();

        assert_eq!(doc.sender_id, "u1");
        assert_eq!(doc.receiver_id, "u2");
        assert_eq!(doc.sender_photo_url, None);
        assert_eq!(doc.local_id, None);
    }

    #[test]
    fn missing_optionals_are_defaulted_at_the_boundary() {
        let received_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc: ChatMessageDoc = serde_json::from_value(serde_json::json!({
            "receiverId": "u2",
            "senderID": "u1",
            "senderName": "Alice",
            "message": "hi",
            "type": "text"
        }))
        .unwrap();

        let message = ChatMessage::from_document(doc, received_at);

        assert_eq!(message.sender_photo_url, "");
        assert_eq!(message.local_id, "");
        assert_eq!(message.timestamp, Timestamp(received_at));
        assert_eq!(message.message_type, MessageType::Text);
    }

    #[test]
    fn present_optionals_are_preserved() {
        let received_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let sent_at = Utc.with_ymd_and_hms(2024, 4, 30, 9, 30, 0).unwrap();
        let doc: ChatMessageDoc = serde_json::from_value(serde_json::json!({
            "receiverId": "u2",
            "senderID": "u1",
            "senderName": "Alice",
            "message": "hi",
            "type": "text",
            "senderPhotoUrl": "https://example.com/alice.png",
            "timestamp": sent_at.to_rfc3339(),
            "localId": "local-42"
        }))
        .unwrap();

        let message = ChatMessage::from_document(doc, received_at);

        assert_eq!(message.sender_photo_url, "https://example.com/alice.png");
        assert_eq!(message.local_id, "local-42");
        assert_eq!(message.timestamp, Timestamp(sent_at));
    }

    #[test]
    fn missing_type_tag_falls_back_to_verbatim_body() {
        let doc: ChatMessageDoc = serde_json::from_value(serde_json::json!({
            "receiverId": "u2",
            "senderID": "u1",
            "senderName": "Alice",
            "message": "hi"
        }))
        .unwrap();

        let message = ChatMessage::from_document(doc, Utc::now());
        assert_eq!(
            message.message_type.notification_body(&message.message),
            "hi"
        );
    }
}
