//! Algo_Domo v1.6 帧编解码
//!
//! 线上帧固定 14 字节：
//!
//! ```text
//! [0x49] [address] [command] [g0..g9] [0x46]
//! ```
//!
//! 未指定的 g 字节补零。地址编程是唯一的例外：请求和应答都是单个
//! 裸字节，不走帧格式。

/// 帧起始定界符
pub const START: u8 = 0x49;
/// 帧结束定界符
pub const END: u8 = 0x46;
/// 帧总长
pub const FRAME_LEN: usize = 14;
/// g 负载长度
pub const PAYLOAD_LEN: usize = 10;

/// 命令字节目录。
pub mod commands {
    /// 扩展轮询，无负载
    pub const POLL: u8 = 0x40;
    /// 卷帘：g0=通道（1..4），g1=动作
    pub const SHUTTER: u8 = 0x5c;
    /// 设定点：g0=整数部（0..99），g1=十分位（0..9）
    pub const THERMOSTAT_SETPOINT: u8 = 0x5a;
    /// 输入配置：g0=序号，g1..g3=原始 g2/g3/g4，g4=目标地址
    pub const INPUT_CONFIG: u8 = 0x55;
    /// 查询输入配置（保留，不主动下发）
    pub const INPUT_CONFIG_QUERY: u8 = 0x56;
}

/// 继电器通道到命令字节：1..4 → 0x51..0x54，5..8 → 0x65..0x68。
pub fn relay_command(relay: u8) -> Option<u8> {
    match relay {
        1..=4 => Some(0x50 + relay),
        5..=8 => Some(0x60 + relay),
        _ => None,
    }
}

/// 灯动作表，g0 携带动作码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightAction {
    On,
    Off,
    Pulse,
    Toggle,
    ToggleNoAck,
}

impl LightAction {
    /// 大小写不敏感地解析动作名。
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "pulse" => Some(Self::Pulse),
            "toggle" => Some(Self::Toggle),
            "toggle_no_ack" => Some(Self::ToggleNoAck),
            _ => None,
        }
    }

    /// 线上动作码。
    pub fn code(self) -> u8 {
        match self {
            Self::On => 0x41,
            Self::Off => 0x53,
            Self::Pulse => 0x50,
            Self::Toggle => 0x55,
            Self::ToggleNoAck => 0x54,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Pulse => "pulse",
            Self::Toggle => "toggle",
            Self::ToggleNoAck => "toggle_no_ack",
        }
    }
}

/// 卷帘动作表，g1 携带动作码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterAction {
    Up,
    Down,
    Stop,
}

impl ShutterAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Up => 0x55,
            Self::Down => 0x44,
            Self::Stop => 0x53,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stop => "stop",
        }
    }
}

/// 一帧的逻辑内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub address: u8,
    pub command: u8,
    pub payload: [u8; PAYLOAD_LEN],
}

impl Frame {
    /// 构造一帧，负载不足 10 字节时补零，超出部分忽略。
    pub fn new(address: u8, command: u8, payload: &[u8]) -> Self {
        let mut padded = [0u8; PAYLOAD_LEN];
        let take = payload.len().min(PAYLOAD_LEN);
        padded[..take].copy_from_slice(&payload[..take]);
        Self {
            address,
            command,
            payload: padded,
        }
    }

    /// 缺省命令是扩展轮询。
    pub fn poll(address: u8) -> Self {
        Self::new(address, commands::POLL, &[])
    }

    /// 编码为线上字节。
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut raw = [0u8; FRAME_LEN];
        raw[0] = START;
        raw[1] = self.address;
        raw[2] = self.command;
        raw[3..13].copy_from_slice(&self.payload);
        raw[13] = END;
        raw
    }

    /// 从一段完整的 14 字节解码；定界符由取帧扫描保证。
    pub fn from_bytes(raw: &[u8; FRAME_LEN]) -> Self {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&raw[3..13]);
        Self {
            address: raw[1],
            command: raw[2],
            payload,
        }
    }

    /// 空格分隔的十六进制串，仅用于日志与排查。
    pub fn hex(&self) -> String {
        let raw = self.to_bytes();
        let mut out = String::with_capacity(FRAME_LEN * 3);
        for (offset, byte) in raw.iter().enumerate() {
            if offset > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

/// 从接收缓冲里取出第一个完整帧。
///
/// 从左到右找第一个满足 `buf[i]==0x49 && buf[i+13]==0x46` 的偏移；
/// 中间 12 字节不参与判定。前导垃圾字节被跳过。
pub fn extract_frame(buf: &[u8]) -> Option<Frame> {
    for start in 0..buf.len() {
        if buf[start] != START {
            continue;
        }
        let end = start + FRAME_LEN - 1;
        if end >= buf.len() {
            return None;
        }
        if buf[end] != END {
            continue;
        }
        let mut raw = [0u8; FRAME_LEN];
        raw.copy_from_slice(&buf[start..=end]);
        return Some(Frame::from_bytes(&raw));
    }
    None
}

/// 轮询应答的解码结果。
#[derive(Debug, Clone, PartialEq)]
pub struct PollingReply {
    /// g[0] 低半字节
    pub board_type: u8,
    /// g[0] 高半字节
    pub release: u8,
    pub output_mask: u8,
    /// 反相约定：清零位表示输入电气有效
    pub input_mask: u8,
    pub dimmer: u8,
    /// 符号来自 g[6]，严格等于 0x2d 才是负
    pub temperature: f64,
    pub power_kw: f64,
    pub setpoint: u8,
}

impl PollingReply {
    pub fn from_frame(frame: &Frame) -> Self {
        let g = &frame.payload;
        let magnitude = g[4] as f64 + g[5] as f64 / 10.0;
        let temperature = if g[6] == 0x2d { -magnitude } else { magnitude };
        Self {
            board_type: g[0] & 0x0f,
            release: g[0] >> 4,
            output_mask: g[1],
            input_mask: g[2],
            dimmer: g[3],
            temperature,
            power_kw: g[7] as f64 / 10.0,
            setpoint: g[8],
        }
    }
}
