/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    action::notification::message_created,
    environment::{AppConfig, AppState},
    tools::{logger::setup_tracing, prometheus::prometheus_metrics},
};
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Result;
use std::{env::var, net::Ipv4Addr};
use tracing::*;

pub async fn run_server() -> Result<()> {
    let dhall_config_path = var("DHALL_CONFIG")
        .unwrap_or_else(|_| "./dhall-configs/dev/chat_notification_service.dhall".to_string());
    let app_config = serde_dhall::from_file(dhall_config_path).parse::<AppConfig>()?;

    let _guard = setup_tracing(app_config.logger_cfg.to_owned());

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic Occured : {:?}", panic_info);
    }));

    let app_state = AppState::new(app_config);
    let http_server_port = app_state.http_server_port;

    let prometheus = prometheus_metrics();
    HttpServer::new(move || {
        App::new()
            .wrap(prometheus.clone())
            .app_data(web::Data::new(app_state.clone()))
            .route(
                "/health",
                web::get().to(|| {
                    Box::pin(async { HttpResponse::Ok().body("Chat Notification Service Is Up!") })
                }),
            )
            .route(
                "/trigger/Chat_rooms/{chat_room_id}/Messages/{message_id}",
                web::post().to(message_created),
            )
    })
    .bind((Ipv4Addr::UNSPECIFIED, http_server_port))?
    .shutdown_timeout(60)
    .run()
    .await?;

    Ok(())
}
