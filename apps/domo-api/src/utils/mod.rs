pub mod response;
pub mod validation;

pub use validation::{optional_u8, require_address};

use axum::response::Response;
use std::future::Future;
use tracing::error;

/// 在独立任务里跑完网关事务与状态更新。
///
/// HTTP 客户端中途断开只会丢弃 handler 的 future，不会触及已经
/// spawn 出去的任务：在途事务、锁的交接与状态写入照常走完，
/// 设备侧状态保持一致。
pub async fn run_detached<F>(work: F) -> Response
where
    F: Future<Output = Response> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(response) => response,
        Err(join_error) => {
            error!(error = %join_error, "detached handler task failed");
            response::internal_error()
        }
    }
}
