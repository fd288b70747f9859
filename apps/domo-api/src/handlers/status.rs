//! 状态查询 handler
//!
//! - GET /api/status

use crate::aggregate::aggregate_status;
use crate::middleware::require_token;
use crate::utils::run_detached;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, serde::Deserialize)]
pub struct StatusQuery {
    token: Option<String>,
    refresh: Option<String>,
}

pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let config = state.config_store.current().await;
    if let Err(response) = require_token(&config, query.token.as_deref()) {
        return response;
    }
    let refresh = matches!(query.refresh.as_deref(), Some("1"));
    run_detached(async move {
        let reply = aggregate_status(&state, &config, refresh).await;
        Json(reply).into_response()
    })
    .await
}
