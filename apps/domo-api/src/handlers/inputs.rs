//! 输入配置下发 handler
//!
//! - GET /api/cmd/apply-inputs
//!
//! 对每块匹配的板卡按 index 顺序下发启用的输入配置，逐路收集结果，
//! 单路失败不提前中断；顶层 ok 是所有尝试的逻辑与。

use crate::aggregate::gateway_client;
use crate::middleware::require_token;
use crate::utils::response::gateway_phrase;
use crate::utils::validation::optional_u8;
use crate::utils::run_detached;
use crate::AppState;
use api_contract::{ApplyInputsReply, InputPushResult};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::ADDRESS_MAX;
use domo_protocol::{commands, Frame};
use tracing::warn;

#[derive(Debug, serde::Deserialize)]
pub struct ApplyInputsQuery {
    token: Option<String>,
    board: Option<String>,
    address: Option<String>,
}

pub async fn cmd_apply_inputs(
    State(state): State<AppState>,
    Query(query): Query<ApplyInputsQuery>,
) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }
    let address_filter = match optional_u8(query.address.as_deref(), 0, ADDRESS_MAX) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let board_filter = query
        .board
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    run_detached(async move {
        let client = gateway_client(&config.gateway);
        let mut results = Vec::new();
        let mut all_ok = true;

        for board in config.boards.iter().filter(|board| {
            board_filter.as_deref().map_or(true, |id| board.id == id)
                && address_filter.map_or(true, |address| board.address == address)
        }) {
            // 一次只持一块板的锁，板与板之间顺序推进
            let handle = state.locks.for_address(board.address).await;
            let _guard = handle.lock().await;

            for input in board.inputs.iter().filter(|input| input.enabled) {
                let request = Frame::new(
                    board.address,
                    commands::INPUT_CONFIG,
                    &[input.index, input.g2, input.g3, input.g4, input.target_address],
                );
                match client.transact_frame(&request, None).await {
                    Ok(_) => results.push(InputPushResult {
                        board_id: board.id.clone(),
                        address: board.address,
                        index: input.index,
                        ok: true,
                        error: None,
                    }),
                    Err(error) => {
                        all_ok = false;
                        warn!(
                            board = %board.id,
                            index = input.index,
                            error = %error,
                            "input configuration push failed"
                        );
                        results.push(InputPushResult {
                            board_id: board.id.clone(),
                            address: board.address,
                            index: input.index,
                            ok: false,
                            error: Some(gateway_phrase(&error).to_string()),
                        });
                    }
                }
            }
        }

        Json(ApplyInputsReply {
            ok: all_ok,
            results,
        })
        .into_response()
    })
    .await
}
