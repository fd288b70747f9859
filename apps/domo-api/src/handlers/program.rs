//! 地址编程 handler
//!
//! - GET /api/cmd/program-address
//!
//! 唯一不走帧格式的事务：写出一个等于新地址的裸字节，期待一个
//! 裸字节的确认。

use crate::aggregate::gateway_client;
use crate::middleware::require_token;
use crate::utils::response::gateway_error;
use crate::utils::validation::require_address;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::ProgramAddressReply;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domo_protocol::ProtocolError;

#[derive(Debug, serde::Deserialize)]
pub struct ProgramQuery {
    token: Option<String>,
    address: Option<String>,
}

pub async fn cmd_program_address(
    State(state): State<AppState>,
    Query(query): Query<ProgramQuery>,
) -> Response {
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

        let reply = match client.transact_raw(&[address], 1, None).await {
            Ok(reply) => reply,
            Err(error) => return gateway_error(&error),
        };
        let ack = match reply.first() {
            Some(byte) => *byte,
            None => return gateway_error(&ProtocolError::NoReply),
        };

        Json(ProgramAddressReply {
            ok: true,
            address,
            ack,
            ack_hex: format!("0x{ack:02x}"),
        })
        .into_response()
    })
    .await
}
