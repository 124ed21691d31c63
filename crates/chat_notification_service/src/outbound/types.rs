/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::{DeviceToken, UserRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provider envelope for one notification, addressed to a single device
/// token. Constructed fresh per dispatch, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FcmMessage {
    pub token: String,
    pub notification: NotificationContent,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
    pub data: NotificationData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AndroidConfig {
    pub notification: AndroidNotification,
    /// Rapid messages from one sender collapse into a single tray entry.
    pub collapse_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub click_action: String,
    pub sound: String,
    pub tag: String,
    pub notification_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Aps {
    pub sound: String,
    pub badge: u32,
    /// iOS-side grouping key, same role as the android collapse key.
    pub thread_id: String,
}

/// Free-form section mirrored back to the client on tap/open. Provider
/// constraint: every value is a string.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub click_action: String,
    #[serde(rename = "senderID")]
    pub sender_id: String,
    pub receiver_id: String,
    pub sender_name: String,
    pub photo_url: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub message: String,
    pub timestamp: String,
    pub local_id: String,
    pub chat_room_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a FcmMessage,
}

#[derive(Debug, Deserialize)]
pub struct FcmSendResponse {
    /// Resource name of the accepted message, `projects/*/messages/{id}`.
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreValue {
    #[serde(default)]
    pub string_value: Option<String>,
}

impl From<FirestoreDocument> for UserRecord {
    fn from(document: FirestoreDocument) -> Self {
        // Absent, null and empty-string tokens all mean "no device".
        let token = document
            .fields
            .get("token")
            .and_then(|value| value.string_value.to_owned())
            .filter(|token| !token.is_empty())
            .map(DeviceToken);
        UserRecord { token }
    }
}
