/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    common::{types::*, utils::to_iso8601},
    environment::AppState,
    outbound::{
        external::{PushDelivery, UserStore},
        types::*,
    },
    tools::prometheus::{
        DELIVERED_NOTIFICATIONS, FAILED_NOTIFICATIONS, SKIPPED_NOTIFICATIONS, TOTAL_TRIGGERS,
    },
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::*;

const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
const DEFAULT_SOUND: &str = "default";

pub struct NotificationDispatcher {
    user_store: Arc<dyn UserStore>,
    push_delivery: Arc<dyn PushDelivery>,
}

impl NotificationDispatcher {
    pub fn new(user_store: Arc<dyn UserStore>, push_delivery: Arc<dyn PushDelivery>) -> Self {
        NotificationDispatcher {
            user_store,
            push_delivery,
        }
    }

    /// One straight-line dispatch attempt: recipient lookup, token check,
    /// payload assembly, single submission. Two early-exit skip branches,
    /// one catch-all failure branch, no retry.
    pub async fn dispatch(
        &self,
        message: &ChatMessage,
        context: &TriggerContext,
    ) -> DispatchOutcome {
        let user = match self.user_store.get_user(&message.receiver_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return DispatchOutcome::NoUserFound,
            Err(err) => return DispatchOutcome::Failed(err),
        };

        let token = match user.token {
            Some(token) => token,
            None => return DispatchOutcome::NoDeviceToken,
        };

        let payload = build_notification(message, context, &token);
        match self.push_delivery.send(&payload).await {
            Ok(()) => DispatchOutcome::Delivered,
            Err(err) => DispatchOutcome::Failed(err),
        }
    }
}

/// Pure mapping from the resolved message to the provider envelope. The
/// grouping keys (`collapseKey`, `tag`, `threadId`) always carry the
/// sender's id so rapid messages from one sender collapse in the tray.
pub fn build_notification(
    message: &ChatMessage,
    context: &TriggerContext,
    DeviceToken(token): &DeviceToken,
) -> FcmMessage {
    let UserId(sender_id) = &message.sender_id;
    let UserId(receiver_id) = &message.receiver_id;
    let ChatRoomId(chat_room_id) = &context.chat_room_id;

    FcmMessage {
        token: token.to_owned(),
        notification: NotificationContent {
            title: message.sender_name.to_owned(),
            body: message.message_type.notification_body(&message.message),
        },
        android: AndroidConfig {
            notification: AndroidNotification {
                click_action: CLICK_ACTION.to_string(),
                sound: DEFAULT_SOUND.to_string(),
                tag: sender_id.to_owned(),
                notification_count: 1,
            },
            collapse_key: sender_id.to_owned(),
        },
        apns: ApnsConfig {
            payload: ApnsPayload {
                aps: Aps {
                    sound: DEFAULT_SOUND.to_string(),
                    badge: 1,
                    thread_id: sender_id.to_owned(),
                },
            },
        },
        data: NotificationData {
            click_action: CLICK_ACTION.to_string(),
            sender_id: sender_id.to_owned(),
            receiver_id: receiver_id.to_owned(),
            sender_name: message.sender_name.to_owned(),
            photo_url: message.sender_photo_url.to_owned(),
            message_type: message.message_type.to_string(),
            message: message.message.to_owned(),
            timestamp: to_iso8601(&message.timestamp),
            local_id: message.local_id.to_owned(),
            chat_room_id: chat_room_id.to_owned(),
        },
    }
}

/// Trigger delivery endpoint for
/// `Chat_rooms/{chatRoomId}/Messages/{messageId}` document creations. The
/// platform discards the response, so every outcome maps to 200 and the
/// branch is recorded in logs and counters instead.
pub async fn message_created(
    app_state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    doc: web::Json<ChatMessageDoc>,
) -> HttpResponse {
    TOTAL_TRIGGERS.inc();

    let (chat_room_id, message_id) = path.into_inner();
    let context = TriggerContext {
        chat_room_id: ChatRoomId(chat_room_id),
        message_id: MessageId(message_id),
    };
    let message = ChatMessage::from_document(doc.into_inner(), Utc::now());

    let UserId(receiver_id) = &message.receiver_id;
    info!(
        "New message from {} to {} in chat room {:?}",
        message.sender_name, receiver_id, context.chat_room_id
    );

    match app_state.dispatcher.dispatch(&message, &context).await {
        DispatchOutcome::Delivered => {
            DELIVERED_NOTIFICATIONS.inc();
            info!("Notification sent successfully!");
        }
        DispatchOutcome::NoUserFound => {
            SKIPPED_NOTIFICATIONS.with_label_values(&["no_user"]).inc();
            info!("No user found for {receiver_id}");
        }
        DispatchOutcome::NoDeviceToken => {
            SKIPPED_NOTIFICATIONS.with_label_values(&["no_token"]).inc();
            info!("User {receiver_id} has no device token registered");
        }
        DispatchOutcome::Failed(err) => {
            FAILED_NOTIFICATIONS.inc();
            error!("Error sending notification : {err}");
        }
    }

    HttpResponse::Ok().body("OK")
}
