//! Algo_Domo HTTP 桥接服务
//!
//! 把 HTTP 控制 API 翻译成 Algo_Domo v1.6 的 14 字节帧，经 TCP 网关
//! 与现场板卡交互，并把解码后的板卡状态以 JSON 暴露出来。

pub mod aggregate;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use domo_protocol::AddressLocks;
use domo_store::{ConfigStore, StateStore, StoreError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 各 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub config_store: Arc<ConfigStore>,
    pub state_store: StateStore,
    pub locks: Arc<AddressLocks>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    /// 装载两份文档并启动状态合并刷盘任务。
    pub async fn initialize(data_dir: &Path, static_dir: PathBuf) -> Result<Self, StoreError> {
        let config_store = Arc::new(ConfigStore::load(data_dir.join("config.json")).await?);
        let state_store = StateStore::load(data_dir.join("state.json")).await?;
        state_store.spawn_flusher();
        Ok(Self {
            config_store,
            state_store,
            locks: Arc::new(AddressLocks::new()),
            static_dir: Arc::new(static_dir),
        })
    }
}
