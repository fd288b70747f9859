//! 协议错误类型定义

/// 网关通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 连接、读写等 IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 事务在限期内未完成
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// 帧模式下应答里找不到合法帧
    #[error("no valid frame in reply")]
    BadFrame,

    /// 原始模式下对端关闭前字节数不足
    #[error("no reply from gateway")]
    NoReply,
}
