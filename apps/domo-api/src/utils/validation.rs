//! 请求参数解析辅助函数
//!
//! query 参数统一按十进制解析；失败返回 bad_request 响应。

use crate::utils::response::bad_request;
use api_contract::phrases;
use axum::response::Response;
use domain::ADDRESS_MAX;

/// 必填的总线地址参数。
pub fn require_address(raw: Option<&str>) -> Result<u8, Response> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => parse_in_range(raw, 0, ADDRESS_MAX),
        None => Err(bad_request(phrases::MISSING_PARAMETER)),
    }
}

/// 可选的小整数参数（address/relay/channel）。
pub fn optional_u8(raw: Option<&str>, low: u8, high: u8) -> Result<Option<u8>, Response> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => parse_in_range(raw, low, high).map(Some),
        None => Ok(None),
    }
}

fn parse_in_range(raw: &str, low: u8, high: u8) -> Result<u8, Response> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| bad_request(phrases::INVALID_PARAMETER))?;
    if !((low as i64)..=(high as i64)).contains(&value) {
        return Err(bad_request(phrases::INVALID_PARAMETER));
    }
    Ok(value as u8)
}
