//! 恒温器命令 handler
//!
//! - GET /api/cmd/thermostat

use crate::aggregate::{gateway_client, poll_board};
use crate::middleware::require_token;
use crate::utils::response::{
    bad_request, gateway_error, not_found, snapshot_to_value, thermostat_to_dto,
};
use crate::utils::validation::optional_u8;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::{phrases, ThermostatCommandReply};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{now_epoch_ms, split_setpoint, DerivedThermostatState, ADDRESS_MAX};
use domo_protocol::{commands, Frame};
use tracing::debug;

#[derive(Debug, serde::Deserialize)]
pub struct ThermostatQuery {
    token: Option<String>,
    id: Option<String>,
    address: Option<String>,
    set: Option<String>,
}

pub async fn cmd_thermostat(
    State(state): State<AppState>,
    Query(query): Query<ThermostatQuery>,
) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }

    let set = match query.set.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => return bad_request(phrases::INVALID_SETPOINT),
        },
        _ => return bad_request(phrases::MISSING_PARAMETER),
    };
    let address = match optional_u8(query.address.as_deref(), 0, ADDRESS_MAX) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let thermostat = match config.find_thermostat(query.id.as_deref(), address) {
        Some(thermostat) => thermostat.clone(),
        None => return not_found(phrases::THERMOSTAT_NOT_FOUND),
    };

    let (integer, tenth) = split_setpoint(set);
    let transmitted = integer as f64 + tenth as f64 / 10.0;

    run_detached(async move {
        let client = gateway_client(&config.gateway);
        let handle = state.locks.for_address(thermostat.address).await;
        let _guard = handle.lock().await;

        let request = Frame::new(
            thermostat.address,
            commands::THERMOSTAT_SETPOINT,
            &[integer, tenth],
        );
        if let Err(error) = client.transact_frame(&request, None).await {
            return gateway_error(&error);
        }

        // 事后轮询尽力而为，失败不影响主应答
        let snapshot = match poll_board(&client, thermostat.address).await {
            Ok(snapshot) => {
                state.state_store.record_board(snapshot.clone()).await;
                Some(snapshot)
            }
            Err(error) => {
                debug!(address = thermostat.address, error = %error, "post-command poll failed");
                None
            }
        };

        state
            .state_store
            .record_thermostat(
                &thermostat.id,
                DerivedThermostatState {
                    setpoint: transmitted,
                    updated_at: now_epoch_ms(),
                },
            )
            .await;

        Json(ThermostatCommandReply {
            ok: true,
            entity: thermostat_to_dto(&thermostat),
            setpoint: transmitted,
            integer,
            tenth,
            snapshot: snapshot.as_ref().map(snapshot_to_value),
        })
        .into_response()
    })
    .await
}
