//! 配置读写 handlers
//!
//! - GET /api/config：当前规范化配置
//! - POST /api/config：整体替换并落盘；空请求体表示不变更
//!
//! 这两个端点不走令牌门，配置页预期运行在受保护的局域网里。

use crate::utils::response::{bad_request, internal_error};
use crate::AppState;
use api_contract::{phrases, ConfigReply};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::Configuration;
use serde_json::Value;
use tracing::error;

/// 请求体上限：512 KiB。
const MAX_CONFIG_BODY: usize = 512 * 1024;

pub async fn get_config(State(state): State<AppState>) -> Response {
    let config = state.config_store.current().await;
    Json(config.as_ref().clone()).into_response()
}

pub async fn post_config(State(state): State<AppState>, body: Bytes) -> Response {
    if body.len() > MAX_CONFIG_BODY {
        return bad_request(phrases::BODY_TOO_LARGE);
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        // 空请求体 = 不变更，回显当前配置
        let current = state.config_store.current().await;
        return Json(ConfigReply {
            ok: true,
            config: config_to_value(&current),
        })
        .into_response();
    }
    let doc: Value = match serde_json::from_slice(&body) {
        Ok(doc) => doc,
        Err(_) => return bad_request(phrases::INVALID_BODY),
    };
    match state.config_store.replace(&doc).await {
        Ok(config) => Json(ConfigReply {
            ok: true,
            config: config_to_value(&config),
        })
        .into_response(),
        Err(store_error) => {
            error!(error = %store_error, "configuration replace failed");
            internal_error()
        }
    }
}

fn config_to_value(config: &Configuration) -> Value {
    serde_json::to_value(config).unwrap_or(Value::Null)
}
