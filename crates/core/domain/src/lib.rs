//! 配置模型与实体解析。

pub mod data;

pub use data::{
    infer_light_on, input_active, now_epoch_ms, split_setpoint, BoardSnapshot, BridgeState,
    DerivedLightState, DerivedShutterState, DerivedThermostatState,
};

use serde::{Deserialize, Serialize};

/// 空房间名的缺省分组。
pub const ROOM_FALLBACK: &str = "Senza stanza";

/// 总线地址上限（255 保留给协议）。
pub const ADDRESS_MAX: u8 = 254;

/// 网关连接参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettings {
    /// 网关主机地址
    pub host: String,
    /// 网关端口
    pub port: u16,
    /// 单次事务超时（毫秒）
    pub timeout_ms: u64,
}

impl GatewaySettings {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 1470;
    pub const DEFAULT_TIMEOUT_MS: u64 = 1200;
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// 板卡上的一路光耦输入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// 输入序号（1..8，板内唯一）
    pub index: u8,
    pub name: String,
    pub room: String,
    /// 关闭后 apply-inputs 跳过该路
    pub enabled: bool,
    /// 输入配置负载原始字节
    pub g2: u8,
    pub g3: u8,
    pub g4: u8,
    /// 输入动作指向的板卡地址（缺省为所属板卡地址）
    pub target_address: u8,
}

/// 总线上的一块控制板。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub address: u8,
    pub name: String,
    /// 规范化后恒为 8 路，按 index 升序
    pub inputs: Vec<Input>,
}

/// 灯：绑定到某板卡的一路继电器。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
    /// 继电器序号（1..8）
    pub relay: u8,
}

/// 卷帘：绑定到某板卡的一路卷帘通道。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shutter {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
    /// 卷帘通道（1..4）
    pub channel: u8,
}

/// 恒温器：每块板卡一路设定点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thermostat {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
    /// 配置的设定点（摄氏度）
    pub setpoint: f64,
}

/// 用户权威配置文档，POST /api/config 整体替换。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub gateway: GatewaySettings,
    /// 空串表示拒绝所有受令牌保护的请求
    pub api_token: String,
    pub boards: Vec<Board>,
    pub lights: Vec<Light>,
    pub shutters: Vec<Shutter>,
    pub thermostats: Vec<Thermostat>,
}

impl Configuration {
    /// 按 id（优先）或 (address, relay) 查找灯。
    ///
    /// 非空 id 一旦给出就只按 id 匹配，不再回退到地址查找。
    pub fn find_light(
        &self,
        id: Option<&str>,
        address: Option<u8>,
        relay: Option<u8>,
    ) -> Option<&Light> {
        if let Some(id) = id.filter(|value| !value.is_empty()) {
            return self.lights.iter().find(|light| light.id == id);
        }
        let (address, relay) = (address?, relay?);
        self.lights
            .iter()
            .find(|light| light.address == address && light.relay == relay)
    }

    /// 按 id（优先）或 (address, channel) 查找卷帘。
    pub fn find_shutter(
        &self,
        id: Option<&str>,
        address: Option<u8>,
        channel: Option<u8>,
    ) -> Option<&Shutter> {
        if let Some(id) = id.filter(|value| !value.is_empty()) {
            return self.shutters.iter().find(|shutter| shutter.id == id);
        }
        let (address, channel) = (address?, channel?);
        self.shutters
            .iter()
            .find(|shutter| shutter.address == address && shutter.channel == channel)
    }

    /// 按 id（优先）或 address 查找恒温器。
    pub fn find_thermostat(&self, id: Option<&str>, address: Option<u8>) -> Option<&Thermostat> {
        if let Some(id) = id.filter(|value| !value.is_empty()) {
            return self.thermostats.iter().find(|thermo| thermo.id == id);
        }
        let address = address?;
        self.thermostats
            .iter()
            .find(|thermo| thermo.address == address)
    }

    /// 按 id（优先）或 address 查找板卡。
    pub fn find_board(&self, id: Option<&str>, address: Option<u8>) -> Option<&Board> {
        if let Some(id) = id.filter(|value| !value.is_empty()) {
            return self.boards.iter().find(|board| board.id == id);
        }
        let address = address?;
        self.boards.iter().find(|board| board.address == address)
    }

    /// 配置中出现过的全部板卡地址，升序去重。
    pub fn known_addresses(&self) -> Vec<u8> {
        let mut addresses: Vec<u8> = self
            .boards
            .iter()
            .map(|board| board.address)
            .chain(self.lights.iter().map(|light| light.address))
            .chain(self.shutters.iter().map(|shutter| shutter.address))
            .chain(self.thermostats.iter().map(|thermo| thermo.address))
            .collect();
        addresses.sort_unstable();
        addresses.dedup();
        addresses
    }
}

impl Default for Configuration {
    /// 种子配置：本地网关、空令牌、空实体列表。
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            api_token: String::new(),
            boards: Vec::new(),
            lights: Vec::new(),
            shutters: Vec::new(),
            thermostats: Vec::new(),
        }
    }
}
