//! HTTP 响应辅助函数与 DTO 转换
//!
//! 所有错误响应走统一的 `{ok:false, error:"<短语>"}` 外形，
//! 网关错误在这里映射为面向客户端的意大利语短语。

use api_contract::{phrases, ErrorBody, LightDto, ShutterDto, ThermostatDto};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{BoardSnapshot, Light, Shutter, Thermostat};
use domo_protocol::ProtocolError;

/// 参数错误响应
pub fn bad_request(phrase: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(phrase))).into_response()
}

/// 令牌错误响应
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new(phrases::UNAUTHORIZED)),
    )
        .into_response()
}

/// 资源未找到响应
pub fn not_found(phrase: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(phrase))).into_response()
}

/// 方法不允许响应
pub fn method_not_allowed_response() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new(phrases::METHOD_NOT_ALLOWED)),
    )
        .into_response()
}

/// 内部错误响应
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(phrases::INTERNAL)),
    )
        .into_response()
}

/// 网关错误到意大利语短语。
pub fn gateway_phrase(error: &ProtocolError) -> &'static str {
    match error {
        ProtocolError::Timeout(_) => phrases::GATEWAY_TIMEOUT,
        ProtocolError::BadFrame => phrases::GATEWAY_PROTOCOL,
        ProtocolError::NoReply => phrases::GATEWAY_NO_REPLY,
        ProtocolError::Io(_) => phrases::GATEWAY_TRANSPORT,
    }
}

/// 网关错误响应
pub fn gateway_error(error: &ProtocolError) -> Response {
    tracing::error!(error = %error, "gateway transaction failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(gateway_phrase(error))),
    )
        .into_response()
}

/// Light 转 LightDto
pub fn light_to_dto(light: &Light) -> LightDto {
    LightDto {
        id: light.id.clone(),
        name: light.name.clone(),
        room: light.room.clone(),
        address: light.address,
        relay: light.relay,
    }
}

/// Shutter 转 ShutterDto
pub fn shutter_to_dto(shutter: &Shutter) -> ShutterDto {
    ShutterDto {
        id: shutter.id.clone(),
        name: shutter.name.clone(),
        room: shutter.room.clone(),
        address: shutter.address,
        channel: shutter.channel,
    }
}

/// Thermostat 转 ThermostatDto
pub fn thermostat_to_dto(thermostat: &Thermostat) -> ThermostatDto {
    ThermostatDto {
        id: thermostat.id.clone(),
        name: thermostat.name.clone(),
        room: thermostat.room.clone(),
        address: thermostat.address,
    }
}

/// 快照转响应负载。
pub fn snapshot_to_value(snapshot: &BoardSnapshot) -> serde_json::Value {
    serde_json::to_value(snapshot).unwrap_or(serde_json::Value::Null)
}
