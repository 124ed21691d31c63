/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    action::notification::NotificationDispatcher,
    outbound::external::{FcmClient, FirestoreUserStore},
    tools::logger::LoggerConfig,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FcmConfig {
    pub base_url: String,
    pub project_id: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub http_server_port: u16,
    pub logger_cfg: LoggerConfig,
    pub firestore_cfg: FirestoreConfig,
    pub fcm_cfg: FcmConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
    pub http_server_port: u16,
}

impl AppState {
    pub fn new(app_config: AppConfig) -> AppState {
        // One HTTP client per process, shared by both outbound collaborators.
        let client = reqwest::Client::new();

        let user_store = Arc::new(FirestoreUserStore::new(
            client.to_owned(),
            &app_config.firestore_cfg,
        ));
        let push_delivery = Arc::new(FcmClient::new(client, &app_config.fcm_cfg));

        AppState {
            dispatcher: Arc::new(NotificationDispatcher::new(user_store, push_delivery)),
            http_server_port: app_config.http_server_port,
        }
    }
}
