//! 配置与状态文档存储
//!
//! 两份 JSON 文档落在数据目录下：
//! - `config.json`：用户权威配置，POST 时整体替换
//! - `state.json`：线上观测推导出的状态，变更后合并落盘
//!
//! 模块划分：
//! - [`normalize`]：宽容解析 + 区间钳制 + id 规范化，幂等
//! - [`config_store`]：配置装载、替换与原子换入
//! - [`state_store`]：状态读写与约 200 毫秒的合并刷盘
//! - [`error`]：统一的存储错误类型
//!
//! 两份文档互不沾染：配置替换失败不触碰状态，轮询写状态不触碰配置。
//! 所有落盘都走临时文件 + rename，读者不会看到半截文档。

pub mod config_store;
pub mod error;
pub mod normalize;
pub mod state_store;

mod persist;

pub use config_store::ConfigStore;
pub use error::StoreError;
pub use normalize::normalize_config;
pub use state_store::StateStore;
