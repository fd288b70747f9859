//! 状态文档存储：字段级更新 + 合并刷盘。

use crate::error::StoreError;
use crate::persist::{render_document, write_atomic};
use domain::{
    now_epoch_ms, BoardSnapshot, BridgeState, DerivedLightState, DerivedShutterState,
    DerivedThermostatState,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tracing::warn;

/// 最后一次变更到落盘的合并窗口。
const FLUSH_DELAY: Duration = Duration::from_millis(200);

struct Inner {
    path: PathBuf,
    state: RwLock<BridgeState>,
    dirty: Notify,
}

/// `state.json` 的内存视图。
///
/// 变更把刷盘排到约 200 毫秒之后，窗口内的后续变更搭同一次刷盘；
/// 已排定的刷盘由后台任务执行，不随发起它的请求结束而丢失。
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<Inner>,
}

impl StateStore {
    /// 启动装载：缺文件从空状态起步，坏文档丢弃并告警。
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BridgeState>(&raw) {
                Ok(mut state) => {
                    // 键是权威：快照地址与所在键对齐
                    for (address, snapshot) in state.boards.iter_mut() {
                        snapshot.address = *address;
                    }
                    state
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "state document unreadable, starting empty");
                    BridgeState::default()
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => BridgeState::default(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self {
            inner: Arc::new(Inner {
                path,
                state: RwLock::new(state),
                dirty: Notify::new(),
            }),
        })
    }

    /// 启动后台合并刷盘任务。
    pub fn spawn_flusher(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                store.inner.dirty.notified().await;
                tokio::time::sleep(FLUSH_DELAY).await;
                if let Err(error) = store.flush_now().await {
                    warn!(error = %error, "state flush failed");
                }
            }
        });
    }

    /// 立即把当前状态落盘。
    pub async fn flush_now(&self) -> Result<(), StoreError> {
        let rendered = {
            let state = self.inner.state.read().await;
            render_document(&*state)?
        };
        write_atomic(&self.inner.path, &rendered).await
    }

    /// 聚合用的整体快照。
    pub async fn read(&self) -> BridgeState {
        self.inner.state.read().await.clone()
    }

    pub async fn board_snapshot(&self, address: u8) -> Option<BoardSnapshot> {
        self.inner.state.read().await.boards.get(&address).cloned()
    }

    pub async fn light_state(&self, id: &str) -> Option<DerivedLightState> {
        self.inner.state.read().await.lights.get(id).cloned()
    }

    pub async fn shutter_state(&self, id: &str) -> Option<DerivedShutterState> {
        self.inner.state.read().await.shutters.get(id).cloned()
    }

    pub async fn thermostat_state(&self, id: &str) -> Option<DerivedThermostatState> {
        self.inner.state.read().await.thermostats.get(id).cloned()
    }

    /// 写入某地址的最新快照。
    pub async fn record_board(&self, snapshot: BoardSnapshot) {
        let mut state = self.inner.state.write().await;
        state.updated_at = now_epoch_ms();
        state.boards.insert(snapshot.address, snapshot);
        drop(state);
        self.inner.dirty.notify_one();
    }

    pub async fn record_light(&self, id: &str, derived: DerivedLightState) {
        let mut state = self.inner.state.write().await;
        state.updated_at = now_epoch_ms();
        state.lights.insert(id.to_string(), derived);
        drop(state);
        self.inner.dirty.notify_one();
    }

    pub async fn record_shutter(&self, id: &str, derived: DerivedShutterState) {
        let mut state = self.inner.state.write().await;
        state.updated_at = now_epoch_ms();
        state.shutters.insert(id.to_string(), derived);
        drop(state);
        self.inner.dirty.notify_one();
    }

    pub async fn record_thermostat(&self, id: &str, derived: DerivedThermostatState) {
        let mut state = self.inner.state.write().await;
        state.updated_at = now_epoch_ms();
        state.thermostats.insert(id.to_string(), derived);
        drop(state);
        self.inner.dirty.notify_one();
    }
}
