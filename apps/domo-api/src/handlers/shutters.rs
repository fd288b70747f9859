//! 卷帘命令 handler
//!
//! - GET /api/cmd/shutter

use crate::aggregate::gateway_client;
use crate::middleware::require_token;
use crate::utils::response::{bad_request, gateway_error, not_found, shutter_to_dto};
use crate::utils::validation::optional_u8;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::{phrases, ShutterCommandReply};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{now_epoch_ms, DerivedShutterState, ADDRESS_MAX};
use domo_protocol::{commands, Frame, ShutterAction};

#[derive(Debug, serde::Deserialize)]
pub struct ShutterQuery {
    token: Option<String>,
    id: Option<String>,
    address: Option<String>,
    channel: Option<String>,
    action: Option<String>,
}

pub async fn cmd_shutter(
    State(state): State<AppState>,
    Query(query): Query<ShutterQuery>,
) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }

    let action = match query.action.as_deref().and_then(ShutterAction::parse) {
        Some(action) => action,
        None => return bad_request(phrases::INVALID_ACTION),
    };
    let address = match optional_u8(query.address.as_deref(), 0, ADDRESS_MAX) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let channel = match optional_u8(query.channel.as_deref(), 1, 4) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let shutter = match config.find_shutter(query.id.as_deref(), address, channel) {
        Some(shutter) => shutter.clone(),
        None => return not_found(phrases::SHUTTER_NOT_FOUND),
    };

    run_detached(async move {
        let client = gateway_client(&config.gateway);
        let handle = state.locks.for_address(shutter.address).await;
        let _guard = handle.lock().await;

        let request = Frame::new(
            shutter.address,
            commands::SHUTTER,
            &[shutter.channel, action.code()],
        );
        if let Err(error) = client.transact_frame(&request, None).await {
            return gateway_error(&error);
        }

        state
            .state_store
            .record_shutter(
                &shutter.id,
                DerivedShutterState {
                    last_action: Some(action.as_str().to_string()),
                    updated_at: now_epoch_ms(),
                },
            )
            .await;

        Json(ShutterCommandReply {
            ok: true,
            entity: shutter_to_dto(&shutter),
            action: action.as_str().to_string(),
        })
        .into_response()
    })
    .await
}
