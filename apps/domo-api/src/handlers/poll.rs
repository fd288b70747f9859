//! 轮询 handler
//!
//! - GET /api/cmd/poll

use crate::aggregate::{gateway_client, poll_board};
use crate::middleware::require_token;
use crate::utils::response::{gateway_error, snapshot_to_value};
use crate::utils::validation::require_address;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::PollReply;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, serde::Deserialize)]
pub struct PollQuery {
    token: Option<String>,
    address: Option<String>,
}

pub async fn cmd_poll(State(state): State<AppState>, Query(query): Query<PollQuery>) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }
    let address = match require_address(query.address.as_deref()) {
        Ok(address) => address,
        Err(response) => return response,
    };

    run_detached(async move {
        let client = gateway_client(&config.gateway);
        let handle = state.locks.for_address(address).await;
        let _guard = handle.lock().await;

        let snapshot = match poll_board(&client, address).await {
            Ok(snapshot) => snapshot,
            Err(error) => return gateway_error(&error),
        };
        state.state_store.record_board(snapshot.clone()).await;

        Json(PollReply {
            ok: true,
            address,
            snapshot: snapshot_to_value(&snapshot),
        })
        .into_response()
    })
    .await
}
