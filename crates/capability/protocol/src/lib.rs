//! Algo_Domo v1.6 总线协议层
//!
//! 包含三块能力：
//! - `frame`：14 字节帧的编解码与命令目录
//! - `client`：每事务一条 TCP 连接的网关客户端
//! - `locks`：按板卡地址的互斥表，保证同一地址串行

pub mod client;
pub mod error;
pub mod frame;
pub mod locks;

pub use client::{GatewayClient, GatewayEndpoint};
pub use error::ProtocolError;
pub use frame::{
    commands, extract_frame, relay_command, Frame, LightAction, PollingReply, ShutterAction,
    FRAME_LEN, PAYLOAD_LEN,
};
pub use locks::AddressLocks;
