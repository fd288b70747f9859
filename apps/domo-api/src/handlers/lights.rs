//! 灯命令 handler
//!
//! - GET /api/cmd/light

use crate::aggregate::{gateway_client, poll_board};
use crate::middleware::require_token;
use crate::utils::response::{
    bad_request, gateway_error, internal_error, light_to_dto, not_found, snapshot_to_value,
};
use crate::utils::validation::optional_u8;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::{phrases, LightCommandReply};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{infer_light_on, now_epoch_ms, DerivedLightState, ADDRESS_MAX};
use domo_protocol::{relay_command, Frame, LightAction};
use tracing::debug;

#[derive(Debug, serde::Deserialize)]
pub struct LightQuery {
    token: Option<String>,
    id: Option<String>,
    address: Option<String>,
    relay: Option<String>,
    action: Option<String>,
}

pub async fn cmd_light(
    State(state): State<AppState>,
    Query(query): Query<LightQuery>,
) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }

    let action = match query.action.as_deref().and_then(LightAction::parse) {
        Some(action) => action,
        None => return bad_request(phrases::INVALID_ACTION),
    };
    let address = match optional_u8(query.address.as_deref(), 0, ADDRESS_MAX) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let relay = match optional_u8(query.relay.as_deref(), 1, 8) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let light = match config.find_light(query.id.as_deref(), address, relay) {
        Some(light) => light.clone(),
        None => return not_found(phrases::LIGHT_NOT_FOUND),
    };
    let command = match relay_command(light.relay) {
        Some(command) => command,
        None => return internal_error(),
    };

    run_detached(async move {
        let client = gateway_client(&config.gateway);
        let handle = state.locks.for_address(light.address).await;
        let _guard = handle.lock().await;

        let request = Frame::new(light.address, command, &[action.code()]);
        if let Err(error) = client.transact_frame(&request, None).await {
            return gateway_error(&error);
        }

        // 事后轮询尽力而为，失败不影响主应答
        let snapshot = match poll_board(&client, light.address).await {
            Ok(snapshot) => {
                state.state_store.record_board(snapshot.clone()).await;
                Some(snapshot)
            }
            Err(error) => {
                debug!(address = light.address, error = %error, "post-command poll failed");
                None
            }
        };

        let previous = state
            .state_store
            .light_state(&light.id)
            .await
            .and_then(|derived| derived.is_on);
        let is_on = infer_light_on(light.relay, snapshot.as_ref(), previous, Some(action.as_str()));
        state
            .state_store
            .record_light(
                &light.id,
                DerivedLightState {
                    is_on,
                    last_action: Some(action.as_str().to_string()),
                    updated_at: now_epoch_ms(),
                },
            )
            .await;

        Json(LightCommandReply {
            ok: true,
            entity: light_to_dto(&light),
            action: action.as_str().to_string(),
            is_on,
            snapshot: snapshot.as_ref().map(snapshot_to_value),
        })
        .into_response()
    })
    .await
}
