/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use crate::{
    common::types::{UserId, UserRecord},
    environment::{FcmConfig, FirestoreConfig},
    tools::{
        callapi::{call_api, CallApiError},
        error::AppError,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use tracing::info;

/// Point lookups against the externally owned user collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, AppError>;
}

/// Submission of one assembled envelope to the push provider.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn send(&self, message: &FcmMessage) -> Result<(), AppError>;
}

pub struct FirestoreUserStore {
    client: Client,
    base_url: Url,
    project_id: String,
    auth_token: String,
}

impl FirestoreUserStore {
    pub fn new(client: Client, firestore_cfg: &FirestoreConfig) -> Self {
        Self {
            client,
            base_url: Url::parse(&firestore_cfg.base_url).expect("Failed to parse base_url."),
            project_id: firestore_cfg.project_id.to_owned(),
            auth_token: firestore_cfg.auth_token.to_owned(),
        }
    }

    fn document_url(&self, UserId(user_id): &UserId) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut().expect("Invalid base URL").extend([
            "projects",
            self.project_id.as_str(),
            "databases",
            "(default)",
            "documents",
            "Users",
            user_id.as_str(),
        ]);
        url
    }
}

#[async_trait]
impl UserStore for FirestoreUserStore {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, AppError> {
        let url = self.document_url(user_id);
        let authorization = format!("Bearer {}", self.auth_token);

        let resp: Result<FirestoreDocument, CallApiError> = call_api::<FirestoreDocument, ()>(
            &self.client,
            Method::GET,
            &url,
            vec![
                ("content-type", "application/json"),
                ("authorization", authorization.as_str()),
            ],
            None,
        )
        .await;

        match resp {
            Ok(document) => Ok(Some(UserRecord::from(document))),
            // A deleted or never-created user is a skip, not an error.
            Err(CallApiError::ExternalAPICallError(response))
                if response.status() == StatusCode::NOT_FOUND =>
            {
                Ok(None)
            }
            Err(err) => Err(AppError::UserLookupFailed(err.to_string())),
        }
    }
}

pub struct FcmClient {
    client: Client,
    base_url: Url,
    project_id: String,
    auth_token: String,
}

impl FcmClient {
    pub fn new(client: Client, fcm_cfg: &FcmConfig) -> Self {
        Self {
            client,
            base_url: Url::parse(&fcm_cfg.base_url).expect("Failed to parse base_url."),
            project_id: fcm_cfg.project_id.to_owned(),
            auth_token: fcm_cfg.auth_token.to_owned(),
        }
    }

    fn send_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut().expect("Invalid base URL").extend([
            "projects",
            self.project_id.as_str(),
            "messages:send",
        ]);
        url
    }
}

#[async_trait]
impl PushDelivery for FcmClient {
    async fn send(&self, message: &FcmMessage) -> Result<(), AppError> {
        let url = self.send_url();
        let authorization = format!("Bearer {}", self.auth_token);

        let FcmSendResponse { name } = call_api::<FcmSendResponse, SendMessageRequest>(
            &self.client,
            Method::POST,
            &url,
            vec![
                ("content-type", "application/json"),
                ("authorization", authorization.as_str()),
            ],
            Some(SendMessageRequest { message }),
        )
        .await
        .map_err(|err| AppError::PushDeliveryFailed(err.to_string()))?;

        info!("FCM accepted message : {name}");
        Ok(())
    }
}
