//! 路由定义
//!
//! 固定路由表，路径映射到对应 handlers：
//! - 页面：/ → /control 重定向，/control 与 /config 是静态页
//! - 健康检查：/health
//! - 配置：GET/POST /api/config（不走令牌门）
//! - 状态：/api/status
//! - 命令：/api/cmd/{light,shutter,thermostat,poll,apply-inputs,program-address}
//!
//! /api/* 上不允许的方法回 405 JSON，未知路径回 404 JSON。

use crate::handlers::{
    cmd_apply_inputs, cmd_light, cmd_poll, cmd_program_address, cmd_shutter, cmd_thermostat,
    config_page, control_page, favicon, get_config, get_status, health, method_not_allowed,
    post_config, root_redirect, route_fallback,
};
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

/// 创建 API 路由。
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_redirect))
        .route("/control", get(control_page))
        .route("/config", get(config_page))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
        .route(
            "/api/config",
            get(get_config)
                .post(post_config)
                .fallback(method_not_allowed)
                // 体积上限由 handler 自己按 512 KiB 判 400
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/api/status", get(get_status).fallback(method_not_allowed))
        .route("/api/cmd/light", get(cmd_light).fallback(method_not_allowed))
        .route(
            "/api/cmd/shutter",
            get(cmd_shutter).fallback(method_not_allowed),
        )
        .route(
            "/api/cmd/thermostat",
            get(cmd_thermostat).fallback(method_not_allowed),
        )
        .route("/api/cmd/poll", get(cmd_poll).fallback(method_not_allowed))
        .route(
            "/api/cmd/apply-inputs",
            get(cmd_apply_inputs).fallback(method_not_allowed),
        )
        .route(
            "/api/cmd/program-address",
            get(cmd_program_address).fallback(method_not_allowed),
        )
        .fallback(route_fallback)
}
