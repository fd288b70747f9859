//! 配置文档装载与整体替换。

use crate::error::StoreError;
use crate::normalize::normalize_config;
use crate::persist::{render_document, write_atomic};
use domain::Configuration;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// `config.json` 的内存视图与持久化。
///
/// 当前配置以 `Arc` 快照提供：POST 换入新配置后，换入前取到快照的
/// 请求继续看旧视图直到结束，不存在半更新可见性。
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Arc<Configuration>>,
}

impl ConfigStore {
    /// 启动装载：建数据目录，缺文件时落种子配置，读入并规范化。
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if !tokio::fs::try_exists(&path).await? {
            write_atomic(&path, &render_document(&Configuration::default())?).await?;
            info!(path = %path.display(), "seeded default configuration");
        }
        let raw = tokio::fs::read_to_string(&path).await?;
        let doc: Value = serde_json::from_str(&raw)?;
        let config = normalize_config(&doc);
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// 当前配置快照。
    pub async fn current(&self) -> Arc<Configuration> {
        self.current.read().await.clone()
    }

    /// 整体替换：规范化、落盘、原子换入。落盘失败不换入。
    pub async fn replace(&self, doc: &Value) -> Result<Arc<Configuration>, StoreError> {
        let config = Arc::new(normalize_config(doc));
        write_atomic(&self.path, &render_document(config.as_ref())?).await?;
        let mut slot = self.current.write().await;
        *slot = config.clone();
        drop(slot);
        info!(
            boards = config.boards.len(),
            lights = config.lights.len(),
            shutters = config.shutters.len(),
            thermostats = config.thermostats.len(),
            "configuration replaced"
        );
        Ok(config)
    }
}
