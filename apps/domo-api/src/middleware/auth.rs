//! 请求上下文与令牌门
//!
//! - request_context：在所有请求前注入 request_id/trace_id
//! - require_token：query 里的 token 与配置的 apiToken 全等才放行

use axum::{body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response};
use domain::Configuration;
use domo_telemetry::new_request_ids;
use tracing::{info_span, Instrument};

use crate::utils::response::unauthorized;

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 令牌门：普通字符串全等比较；配置为空串时拒绝一切受保护请求。
pub fn require_token(config: &Configuration, token: Option<&str>) -> Result<(), Response> {
    if config.api_token.is_empty() {
        return Err(unauthorized());
    }
    match token {
        Some(token) if token == config.api_token => Ok(()),
        _ => Err(unauthorized()),
    }
}

#[cfg(test)]
mod tests {
    use super::require_token;
    use domain::Configuration;

    #[test]
    fn blank_configured_token_denies_everyone() {
        let config = Configuration::default();
        assert!(require_token(&config, Some("qualcosa")).is_err());
        assert!(require_token(&config, None).is_err());
    }

    #[test]
    fn token_must_match_exactly() {
        let config = Configuration {
            api_token: "segreto".to_string(),
            ..Configuration::default()
        };
        assert!(require_token(&config, Some("segreto")).is_ok());
        assert!(require_token(&config, Some("Segreto")).is_err());
        assert!(require_token(&config, None).is_err());
    }
}
