//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 面向客户端的错误短语清单（意大利语，跨前后端对齐）。
pub mod phrases {
    pub const MISSING_PARAMETER: &str = "parametro mancante";
    pub const INVALID_PARAMETER: &str = "parametro non valido";
    pub const INVALID_ACTION: &str = "azione non valida";
    pub const INVALID_SETPOINT: &str = "valore di setpoint non valido";
    pub const INVALID_BODY: &str = "JSON non valido";
    pub const BODY_TOO_LARGE: &str = "corpo della richiesta troppo grande";
    pub const UNAUTHORIZED: &str = "token non valido";
    pub const LIGHT_NOT_FOUND: &str = "luce non trovata";
    pub const SHUTTER_NOT_FOUND: &str = "tapparella non trovata";
    pub const THERMOSTAT_NOT_FOUND: &str = "termostato non trovato";
    pub const PAGE_NOT_FOUND: &str = "pagina non trovata";
    pub const ROUTE_NOT_FOUND: &str = "percorso sconosciuto";
    pub const METHOD_NOT_ALLOWED: &str = "metodo non consentito";
    pub const GATEWAY_PROTOCOL: &str = "risposta del gateway non valida";
    pub const GATEWAY_TIMEOUT: &str = "timeout del gateway";
    pub const GATEWAY_TRANSPORT: &str = "errore di comunicazione con il gateway";
    pub const GATEWAY_NO_REPLY: &str = "nessuna risposta dal gateway";
    pub const INTERNAL: &str = "errore interno";
}

/// 失败响应统一外形：`{ok:false, error:"…"}`。
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: phrase.into(),
        }
    }
}

/// 命令响应里回显的灯实体。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDto {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
    pub relay: u8,
}

/// 命令响应里回显的卷帘实体。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterDto {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
    pub channel: u8,
}

/// 命令响应里回显的恒温器实体。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatDto {
    pub id: String,
    pub name: String,
    pub room: String,
    pub address: u8,
}

/// GET /api/cmd/light 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightCommandReply {
    pub ok: bool,
    pub entity: LightDto,
    pub action: String,
    pub is_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,
}

/// GET /api/cmd/shutter 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterCommandReply {
    pub ok: bool,
    pub entity: ShutterDto,
    pub action: String,
}

/// GET /api/cmd/thermostat 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatCommandReply {
    pub ok: bool,
    pub entity: ThermostatDto,
    /// 实际下发的设定点（按十分位取整后）
    pub setpoint: f64,
    pub integer: u8,
    pub tenth: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,
}

/// GET /api/cmd/poll 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollReply {
    pub ok: bool,
    pub address: u8,
    pub snapshot: Value,
}

/// GET /api/cmd/program-address 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAddressReply {
    pub ok: bool,
    pub address: u8,
    pub ack: u8,
    pub ack_hex: String,
}

/// apply-inputs 中单路输入的下发结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPushResult {
    pub board_id: String,
    pub address: u8,
    pub index: u8,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/cmd/apply-inputs 响应体，ok 为所有结果的逻辑与。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInputsReply {
    pub ok: bool,
    pub results: Vec<InputPushResult>,
}

/// 状态聚合里的一盏灯。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightStatus {
    pub id: String,
    pub name: String,
    pub address: u8,
    pub relay: u8,
    pub is_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    pub updated_at: Option<i64>,
}

/// 状态聚合里的一路卷帘。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutterStatus {
    pub id: String,
    pub name: String,
    pub address: u8,
    pub channel: u8,
    pub last_action: String,
    pub updated_at: Option<i64>,
}

/// 状态聚合里的一路恒温器。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatStatus {
    pub id: String,
    pub name: String,
    pub address: u8,
    pub temperature: Option<f64>,
    pub setpoint: f64,
    pub board_setpoint: Option<u8>,
    pub updated_at: Option<i64>,
}

/// 状态聚合里的一路板卡输入。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStatus {
    pub board_id: String,
    pub index: u8,
    pub name: String,
    pub enabled: bool,
    /// 无快照时为 null
    pub active: Option<bool>,
}

/// 按房间分组的实体集合。
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub name: String,
    pub lights: Vec<LightStatus>,
    pub shutters: Vec<ShutterStatus>,
    pub thermostats: Vec<ThermostatStatus>,
    pub inputs: Vec<InputStatus>,
}

/// 刷新失败的单条记录。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshError {
    pub address: u8,
    pub error: String,
}

/// GET /api/status 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub ok: bool,
    pub updated_at: i64,
    pub refresh_errors: Vec<RefreshError>,
    pub rooms: Vec<RoomStatus>,
}

/// POST /api/config 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReply {
    pub ok: bool,
    pub config: Value,
}
