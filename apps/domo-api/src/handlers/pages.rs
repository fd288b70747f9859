//! 静态页面与基础端点
//!
//! - GET /          → 302 /control
//! - GET /control, /config → 磁盘上的控制页，不缓存
//! - GET /health, /favicon.ico，以及 404/405 兜底

use crate::utils::response::{method_not_allowed_response, not_found};
use crate::AppState;
use api_contract::phrases;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

/// GET / → 302 /control
pub async fn root_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/control")]).into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /favicon.ico → 204
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /control
pub async fn control_page(State(state): State<AppState>) -> Response {
    serve_page(&state, "control.html").await
}

/// GET /config
pub async fn config_page(State(state): State<AppState>) -> Response {
    serve_page(&state, "config.html").await
}

async fn serve_page(state: &AppState, name: &str) -> Response {
    let path = state.static_dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "static page unavailable");
            not_found(phrases::PAGE_NOT_FOUND)
        }
    }
}

/// 未知路径 → 404 JSON
pub async fn route_fallback() -> Response {
    not_found(phrases::ROUTE_NOT_FOUND)
}

/// /api/* 上不允许的方法 → 405 JSON
pub async fn method_not_allowed() -> Response {
    method_not_allowed_response()
}
