//! 按板卡地址的互斥表
//!
//! 同一地址的事务必须串行：持锁范围覆盖从写网关到派生状态更新。
//! 不同地址互不阻塞，多地址并发是有意保留的吞吐特性，不设全局
//! 总线锁。每次事务只持有一个地址的锁，不存在嵌套获取。

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 地址到互斥锁的惰性映射。
#[derive(Default)]
pub struct AddressLocks {
    inner: Mutex<HashMap<u8, Arc<Mutex<()>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取某地址的锁句柄，首次使用时创建。
    pub async fn for_address(&self, address: u8) -> Arc<Mutex<()>> {
        let mut table = self.inner.lock().await;
        table
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_address_is_mutually_exclusive() {
        let locks = Arc::new(AddressLocks::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut tasks = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            tasks.push(tokio::spawn(async move {
                let handle = locks.for_address(5).await;
                let _guard = handle.lock().await;
                let concurrent = in_flight.fetch_add(1, Ordering::SeqCst);
                assert_eq!(concurrent, 0);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.expect("task");
        }
    }

    #[tokio::test]
    async fn distinct_addresses_run_concurrently() {
        let locks = AddressLocks::new();
        let first = locks.for_address(1).await;
        let _held = first.lock().await;

        let second = locks.for_address(2).await;
        let acquired = tokio::time::timeout(Duration::from_millis(50), second.lock()).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn handle_is_stable_per_address() {
        let locks = AddressLocks::new();
        let first = locks.for_address(9).await;
        let again = locks.for_address(9).await;
        assert!(Arc::ptr_eq(&first, &again));
    }
}
