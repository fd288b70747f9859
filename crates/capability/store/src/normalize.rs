//! 配置文档规范化
//!
//! 对任意 JSON 输入做宽容解析并落到受约束的类型模型：
//! - 数值字段接受 JSON 数字、十进制字符串或 `0x` 前缀的十六进制字符串
//! - 越界取值钳到声明区间，无法解析时退回缺省值
//! - id 做 slug 规范化并保证列表内唯一
//! - 未知键丢弃；board 的输入按 index 去重、补齐到 8 路、升序排列
//!
//! 规范化是幂等的：`normalize(normalize(x)) == normalize(x)`。

use domain::{
    Board, Configuration, GatewaySettings, Input, Light, Shutter, Thermostat, ADDRESS_MAX,
    ROOM_FALLBACK,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// 未配置时的恒温器设定点。
const DEFAULT_SETPOINT: f64 = 20.0;

/// 把任意 JSON 文档规范化为配置。
pub fn normalize_config(doc: &Value) -> Configuration {
    Configuration {
        gateway: normalize_gateway(doc.get("gateway")),
        api_token: text(doc.get("apiToken")).unwrap_or_default(),
        boards: normalize_boards(doc.get("boards")),
        lights: normalize_lights(doc.get("lights")),
        shutters: normalize_shutters(doc.get("shutters")),
        thermostats: normalize_thermostats(doc.get("thermostats")),
    }
}

fn normalize_gateway(value: Option<&Value>) -> GatewaySettings {
    let host = value
        .and_then(|obj| text(obj.get("host")))
        .unwrap_or_else(|| GatewaySettings::DEFAULT_HOST.to_string());
    let port = clamp_or(
        value.and_then(|obj| parse_int(obj.get("port")?)),
        1,
        65535,
        GatewaySettings::DEFAULT_PORT as i64,
    ) as u16;
    let timeout_ms = clamp_or(
        value.and_then(|obj| parse_int(obj.get("timeoutMs")?)),
        100,
        20000,
        GatewaySettings::DEFAULT_TIMEOUT_MS as i64,
    ) as u64;
    GatewaySettings {
        host,
        port,
        timeout_ms,
    }
}

fn normalize_boards(value: Option<&Value>) -> Vec<Board> {
    let mut used = HashSet::new();
    items(value)
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let id = unique_id(item.get("id"), "board", position + 1, &mut used);
            let address = address_or(item.get("address"), 0);
            Board {
                name: text(item.get("name")).unwrap_or_else(|| id.clone()),
                inputs: normalize_inputs(item.get("inputs"), address),
                id,
                address,
            }
        })
        .collect()
}

fn normalize_inputs(value: Option<&Value>, board_address: u8) -> Vec<Input> {
    let mut by_index: BTreeMap<u8, Input> = BTreeMap::new();
    for (position, item) in items(value).iter().enumerate() {
        let index = clamp_or(
            parse_opt_int(item.get("index")),
            1,
            8,
            (position + 1).min(8) as i64,
        ) as u8;
        // 同序号重复时首次出现优先
        if by_index.contains_key(&index) {
            continue;
        }
        let input = Input {
            index,
            name: text(item.get("name")).unwrap_or_else(|| format!("Ingresso {index}")),
            room: text(item.get("room")).unwrap_or_else(|| ROOM_FALLBACK.to_string()),
            enabled: item.get("enabled") != Some(&Value::Bool(false)),
            g2: byte_or(item.get("g2"), 0),
            g3: byte_or(item.get("g3"), 0),
            g4: byte_or(item.get("g4"), 0),
            target_address: address_or(item.get("targetAddress"), board_address),
        };
        by_index.insert(index, input);
    }
    // 每块板恒有 8 路：缺席的序号用缺省补齐
    for index in 1..=8u8 {
        by_index.entry(index).or_insert_with(|| Input {
            index,
            name: format!("Ingresso {index}"),
            room: ROOM_FALLBACK.to_string(),
            enabled: true,
            g2: 0,
            g3: 0,
            g4: 0,
            target_address: board_address,
        });
    }
    by_index.into_values().collect()
}

fn normalize_lights(value: Option<&Value>) -> Vec<Light> {
    let mut used = HashSet::new();
    items(value)
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let id = unique_id(item.get("id"), "light", position + 1, &mut used);
            Light {
                name: text(item.get("name")).unwrap_or_else(|| id.clone()),
                room: text(item.get("room")).unwrap_or_else(|| ROOM_FALLBACK.to_string()),
                address: address_or(item.get("address"), 0),
                relay: clamp_or(parse_opt_int(item.get("relay")), 1, 8, 1) as u8,
                id,
            }
        })
        .collect()
}

fn normalize_shutters(value: Option<&Value>) -> Vec<Shutter> {
    let mut used = HashSet::new();
    items(value)
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let id = unique_id(item.get("id"), "shutter", position + 1, &mut used);
            Shutter {
                name: text(item.get("name")).unwrap_or_else(|| id.clone()),
                room: text(item.get("room")).unwrap_or_else(|| ROOM_FALLBACK.to_string()),
                address: address_or(item.get("address"), 0),
                channel: clamp_or(parse_opt_int(item.get("channel")), 1, 4, 1) as u8,
                id,
            }
        })
        .collect()
}

fn normalize_thermostats(value: Option<&Value>) -> Vec<Thermostat> {
    let mut used = HashSet::new();
    items(value)
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let id = unique_id(item.get("id"), "thermostat", position + 1, &mut used);
            let setpoint = item
                .get("setpoint")
                .and_then(parse_real)
                .filter(|value| value.is_finite())
                .unwrap_or(DEFAULT_SETPOINT);
            Thermostat {
                name: text(item.get("name")).unwrap_or_else(|| id.clone()),
                room: text(item.get("room")).unwrap_or_else(|| ROOM_FALLBACK.to_string()),
                address: address_or(item.get("address"), 0),
                setpoint,
                id,
            }
        })
        .collect()
}

/// 列表字段：缺失或类型不对时当作空表。
fn items(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// 数值宽容解析：JSON 数字、十进制字符串、`0x` 十六进制字符串。
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|real| real as i64)),
        Value::String(raw) => {
            let raw = raw.trim();
            match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                Some(hex) => i64::from_str_radix(hex, 16).ok(),
                None => raw.parse::<i64>().ok(),
            }
        }
        _ => None,
    }
}

fn parse_opt_int(value: Option<&Value>) -> Option<i64> {
    value.and_then(parse_int)
}

/// 实数宽容解析：数字或十进制字符串。
fn parse_real(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 可解析时钳到区间，否则退回缺省。
fn clamp_or(value: Option<i64>, low: i64, high: i64, fallback: i64) -> i64 {
    match value {
        Some(value) => value.clamp(low, high),
        None => fallback,
    }
}

fn address_or(value: Option<&Value>, fallback: u8) -> u8 {
    clamp_or(parse_opt_int(value), 0, ADDRESS_MAX as i64, fallback as i64) as u8
}

fn byte_or(value: Option<&Value>, fallback: u8) -> u8 {
    clamp_or(parse_opt_int(value), 0, 255, fallback as i64) as u8
}

/// 字符串字段：裁掉首尾空白，空串视同缺失。
fn text(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// slug 规范化：小写，`[a-z0-9_-]` 之外替换为 `-`，连续 `-` 合并，
/// 去掉首尾 `-`。
fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_dash = false;
    for ch in raw.trim().to_lowercase().chars() {
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            previous_dash = false;
            ch
        } else {
            if previous_dash {
                continue;
            }
            previous_dash = true;
            '-'
        };
        out.push(mapped);
    }
    out.trim_matches('-').to_string()
}

/// 实体 id：slug 后空串退回 `role-<n>`，列表内冲突加 `-<n>` 后缀。
fn unique_id(
    value: Option<&Value>,
    role: &str,
    position: usize,
    used: &mut HashSet<String>,
) -> String {
    let base = value
        .and_then(Value::as_str)
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| format!("{role}-{position}"));
    let mut candidate = base.clone();
    let mut suffix = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}
