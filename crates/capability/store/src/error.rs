//! 存储层错误类型

/// 文档读写错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 文件系统错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 文档不是合法 JSON
    #[error("document parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
