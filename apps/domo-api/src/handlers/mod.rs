//! HTTP handlers
//!
//! 每个命令 handler 的流程一致：解析 → 解析实体 → 拿地址锁 →
//! 组帧 → 与网关事务 → 解码 → 更新状态 → 应答。

pub mod config;
pub mod inputs;
pub mod lights;
pub mod pages;
pub mod poll;
pub mod program;
pub mod shutters;
pub mod status;
pub mod thermostats;

pub use config::*;
pub use inputs::*;
pub use lights::*;
pub use pages::*;
pub use poll::*;
pub use program::*;
pub use shutters::*;
pub use status::*;
pub use thermostats::*;
