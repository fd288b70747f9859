//! 轮询快照、派生状态与状态推断规则。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 某地址最近一次轮询的解码结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub address: u8,
    /// g[0] 低半字节
    pub board_type: u8,
    /// g[0] 高半字节
    pub release: u8,
    pub output_mask: u8,
    /// 线上约定为反相：清零位表示该输入电气有效
    pub input_mask: u8,
    /// "1".."8" 到位值的展开（outputs 为置位即开，inputs 为原始位值）
    pub outputs: BTreeMap<String, bool>,
    pub inputs: BTreeMap<String, bool>,
    pub dimmer: u8,
    pub temperature: f64,
    pub power_kw: f64,
    pub setpoint: u8,
    /// 快照时间（epoch 毫秒）
    pub updated_at: i64,
    /// 原始帧的十六进制串，仅用于排查
    pub frame_hex: String,
}

/// 灯的派生状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedLightState {
    /// 无法推断时为 null
    pub is_on: Option<bool>,
    /// 最近一次下发的原始动作
    pub last_action: Option<String>,
    pub updated_at: i64,
}

/// 卷帘的派生状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedShutterState {
    pub last_action: Option<String>,
    pub updated_at: i64,
}

/// 恒温器的派生状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedThermostatState {
    /// 最近一次下发的设定点（按十分位取整后的值）
    pub setpoint: f64,
    pub updated_at: i64,
}

/// 进程级状态文档，落盘到 state.json。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeState {
    /// 地址到快照的映射，键与快照的 address 一致
    #[serde(default)]
    pub boards: BTreeMap<u8, BoardSnapshot>,
    #[serde(default)]
    pub lights: BTreeMap<String, DerivedLightState>,
    #[serde(default)]
    pub shutters: BTreeMap<String, DerivedShutterState>,
    #[serde(default)]
    pub thermostats: BTreeMap<String, DerivedThermostatState>,
    #[serde(default)]
    pub updated_at: i64,
}

/// 把字节掩码展开为 "1".."8" 到位值的映射。
pub fn mask_to_channels(mask: u8) -> BTreeMap<String, bool> {
    (1u8..=8)
        .map(|channel| (channel.to_string(), mask & (1 << (channel - 1)) != 0))
        .collect()
}

/// 输入是否电气有效：清零位表示有效（反相约定，只在这里反转一次）。
pub fn input_active(input_mask: u8, index: u8) -> bool {
    if !(1..=8).contains(&index) {
        return false;
    }
    input_mask & (1 << (index - 1)) == 0
}

/// 灯开关状态的推断规则。
///
/// 有快照看输出掩码；否则按动作推：on/off 直接给出，toggle 类动作
/// 在已知旧值时取反；其余情况沿用旧值，仍未知则返回 None。
pub fn infer_light_on(
    relay: u8,
    snapshot: Option<&BoardSnapshot>,
    previous: Option<bool>,
    action: Option<&str>,
) -> Option<bool> {
    if let Some(snapshot) = snapshot {
        if (1..=8).contains(&relay) {
            return Some(snapshot.output_mask & (1 << (relay - 1)) != 0);
        }
    }
    match action {
        Some("on") => Some(true),
        Some("off") => Some(false),
        Some("toggle") | Some("toggle_no_ack") => match previous {
            Some(value) => Some(!value),
            None => None,
        },
        _ => previous,
    }
}

/// 把设定点拆成线上可传输的 (整数部, 十分位)。
///
/// 取绝对值后按十分位四舍五入（远离零），整数部钳到 0..99。
/// 负设定点无法在线上表达。
pub fn split_setpoint(value: f64) -> (u8, u8) {
    let tenths = (value.abs() * 10.0).round() as u32;
    let integer = (tenths / 10).min(99) as u8;
    let tenth = (tenths % 10) as u8;
    (integer, tenth)
}

/// 当前时间戳（epoch 毫秒）。
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
