/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{test, web, App};
use async_trait::async_trait;
use chat_notification_service::{
    action::notification::{message_created, NotificationDispatcher},
    common::types::{DeviceToken, UserId, UserRecord},
    environment::AppState,
    outbound::{
        external::{PushDelivery, UserStore},
        types::FcmMessage,
    },
    tools::error::AppError,
};
use std::sync::{Arc, Mutex};

const TRIGGER_URI: &str = "/trigger/Chat_rooms/room-1/Messages/msg-1";

struct StubUserStore {
    user: Option<UserRecord>,
}

#[async_trait]
impl UserStore for StubUserStore {
    async fn get_user(&self, _user_id: &UserId) -> Result<Option<UserRecord>, AppError> {
        Ok(self.user.to_owned())
    }
}

struct RecordingPushDelivery {
    sent: Mutex<Vec<FcmMessage>>,
    reject: bool,
}

#[async_trait]
impl PushDelivery for RecordingPushDelivery {
    async fn send(&self, message: &FcmMessage) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(message.to_owned());
        if self.reject {
            Err(AppError::PushDeliveryFailed(
                "Requested entity was not found.".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

fn app_state(user: Option<UserRecord>, reject: bool) -> (AppState, Arc<RecordingPushDelivery>) {
    let push_delivery = Arc::new(RecordingPushDelivery {
        sent: Mutex::new(Vec::new()),
        reject,
    });
    let app_state = AppState {
        dispatcher: Arc::new(NotificationDispatcher::new(
            Arc::new(StubUserStore { user }),
            push_delivery.clone(),
        )),
        http_server_port: 0,
    };
    (app_state, push_delivery)
}

fn message_body() -> serde_json::Value {
    serde_json::json!({
        "receiverId": "u2",
        "senderID": "u1",
        "senderName": "Alice",
        "message": "hi",
        "type": "text"
    })
}

async fn post_trigger(app_state: AppState, body: serde_json::Value) -> u16 {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .route(
                "/trigger/Chat_rooms/{chat_room_id}/Messages/{message_id}",
                web::post().to(message_created),
            ),
    )
    .await;

    let request = test::TestRequest::post()
        .uri(TRIGGER_URI)
        .set_json(body)
        .to_request();
    test::call_service(&app, request).await.status().as_u16()
}

#[actix_web::test]
async fn trigger_delivers_notification_with_routing_context() {
    let user = Some(UserRecord {
        token: Some(DeviceToken("TOK".to_string())),
    });
    let (app_state, push_delivery) = app_state(user, false);

    let status = post_trigger(app_state, message_body()).await;

    assert_eq!(status, 200);
    let sent = push_delivery.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "TOK");
    assert_eq!(sent[0].notification.body, "hi");
    assert_eq!(sent[0].data.sender_id, "u1");
    assert_eq!(sent[0].data.chat_room_id, "room-1");
}

#[actix_web::test]
async fn trigger_for_deleted_user_still_answers_ok() {
    let (app_state, push_delivery) = app_state(None, false);

    let status = post_trigger(app_state, message_body()).await;

    assert_eq!(status, 200);
    assert!(push_delivery.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn trigger_without_device_token_still_answers_ok() {
    let (app_state, push_delivery) = app_state(Some(UserRecord { token: None }), false);

    let status = post_trigger(app_state, message_body()).await;

    assert_eq!(status, 200);
    assert!(push_delivery.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn provider_rejection_is_swallowed_at_the_boundary() {
    let user = Some(UserRecord {
        token: Some(DeviceToken("STALE".to_string())),
    });
    let (app_state, push_delivery) = app_state(user, true);

    let status = post_trigger(app_state, message_body()).await;

    // One attempt, no retry, and the platform still sees success.
    assert_eq!(status, 200);
    assert_eq!(push_delivery.sent.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn media_message_posts_placeholder_body() {
    let user = Some(UserRecord {
        token: Some(DeviceToken("TOK".to_string())),
    });
    let (app_state, push_delivery) = app_state(user, false);

    let mut body = message_body();
    body["type"] = serde_json::json!("image");
    let status = post_trigger(app_state, body).await;

    assert_eq!(status, 200);
    let sent = push_delivery.sent.lock().unwrap();
    assert_eq!(sent[0].notification.body, "📷 Sent a photo");
    assert_eq!(sent[0].data.message_type, "image");
}
