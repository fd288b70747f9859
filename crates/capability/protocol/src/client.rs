//! 网关事务层
//!
//! 每次事务新开一条到网关的 TCP 连接：一次性写出整个请求，分块读取
//! 应答直到取到一帧（帧模式）或凑够指定字节数（原始模式，地址编程
//! 用）。对端提前关闭时对缓冲做最后一次判定。整个事务受
//! `min(网关配置超时, 调用方覆盖)` 的限期约束，任何退出路径都随连接
//! 析构关闭套接字。

use crate::error::ProtocolError;
use crate::frame::{extract_frame, Frame};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// 网关端点与缺省超时。
#[derive(Debug, Clone)]
pub struct GatewayEndpoint {
    pub host: String,
    pub port: u16,
    /// 单次事务的缺省限期（毫秒）
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy)]
enum ReadMode {
    /// 读到第一个完整帧为止
    Frame,
    /// 读到指定字节数为止
    Raw(usize),
}

enum Outcome {
    Frame(Frame),
    Raw(Vec<u8>),
}

/// 一次事务的网关客户端。
pub struct GatewayClient {
    endpoint: GatewayEndpoint,
}

impl GatewayClient {
    pub fn new(endpoint: GatewayEndpoint) -> Self {
        Self { endpoint }
    }

    /// 发送一帧并等待回帧。
    pub async fn transact_frame(
        &self,
        request: &Frame,
        timeout_override_ms: Option<u64>,
    ) -> Result<Frame, ProtocolError> {
        debug!(
            address = request.address,
            command = request.command,
            frame = %request.hex(),
            "sending frame"
        );
        let deadline = self.deadline_ms(timeout_override_ms);
        match self
            .exchange(&request.to_bytes(), ReadMode::Frame, deadline)
            .await?
        {
            Outcome::Frame(frame) => {
                debug!(address = frame.address, frame = %frame.hex(), "received frame");
                Ok(frame)
            }
            Outcome::Raw(_) => Err(ProtocolError::BadFrame),
        }
    }

    /// 发送原始字节并等待固定长度的应答（地址编程握手）。
    pub async fn transact_raw(
        &self,
        payload: &[u8],
        expected_bytes: usize,
        timeout_override_ms: Option<u64>,
    ) -> Result<Vec<u8>, ProtocolError> {
        debug!(bytes = payload.len(), expected_bytes, "sending raw payload");
        let deadline = self.deadline_ms(timeout_override_ms);
        match self
            .exchange(payload, ReadMode::Raw(expected_bytes), deadline)
            .await?
        {
            Outcome::Raw(bytes) => Ok(bytes),
            Outcome::Frame(_) => Err(ProtocolError::NoReply),
        }
    }

    /// 事务限期：调用方覆盖只能收紧，不能放宽。
    fn deadline_ms(&self, timeout_override_ms: Option<u64>) -> u64 {
        match timeout_override_ms {
            Some(value) => value.min(self.endpoint.timeout_ms),
            None => self.endpoint.timeout_ms,
        }
    }

    async fn exchange(
        &self,
        payload: &[u8],
        mode: ReadMode,
        deadline_ms: u64,
    ) -> Result<Outcome, ProtocolError> {
        let attempt = async {
            let mut stream =
                TcpStream::connect((self.endpoint.host.as_str(), self.endpoint.port)).await?;
            stream.write_all(payload).await?;

            let mut buffer: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 64];
            loop {
                let read = stream.read(&mut chunk).await?;
                if read == 0 {
                    break;
                }
                buffer.extend_from_slice(&chunk[..read]);
                match mode {
                    ReadMode::Frame => {
                        if let Some(frame) = extract_frame(&buffer) {
                            return Ok(Outcome::Frame(frame));
                        }
                    }
                    ReadMode::Raw(expected) => {
                        if buffer.len() >= expected {
                            buffer.truncate(expected);
                            return Ok(Outcome::Raw(buffer));
                        }
                    }
                }
            }

            // 对端提前关闭：对已有缓冲做最后一次判定
            match mode {
                ReadMode::Frame => extract_frame(&buffer)
                    .map(Outcome::Frame)
                    .ok_or(ProtocolError::BadFrame),
                ReadMode::Raw(expected) => {
                    if buffer.len() >= expected {
                        buffer.truncate(expected);
                        Ok(Outcome::Raw(buffer))
                    } else {
                        Err(ProtocolError::NoReply)
                    }
                }
            }
        };

        match timeout(Duration::from_millis(deadline_ms), attempt).await {
            Ok(result) => result,
            Err(_) => Err(ProtocolError::Timeout(deadline_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{commands, FRAME_LEN, START};
    use tokio::net::TcpListener;

    fn endpoint(port: u16, timeout_ms: u64) -> GatewayEndpoint {
        GatewayEndpoint {
            host: "127.0.0.1".to_string(),
            port,
            timeout_ms,
        }
    }

    #[tokio::test]
    async fn frame_reply_survives_garbage_and_chunking() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = vec![0u8; FRAME_LEN];
            socket.read_exact(&mut request).await.expect("request");
            assert_eq!(request[0], START);
            let reply = Frame::new(1, commands::POLL, &[0x12, 0x04, 0xff, 0, 21, 5, 0, 0, 20, 0]);
            let raw = reply.to_bytes();
            socket.write_all(&[0xaa, 0x49, 0xbb]).await.expect("garbage");
            socket.write_all(&raw[..7]).await.expect("first half");
            tokio::time::sleep(Duration::from_millis(20)).await;
            socket.write_all(&raw[7..]).await.expect("second half");
        });

        let client = GatewayClient::new(endpoint(port, 1000));
        let frame = client
            .transact_frame(&Frame::poll(1), None)
            .await
            .expect("frame");
        assert_eq!(frame.command, commands::POLL);
        assert_eq!(frame.payload[1], 0x04);
    }

    #[tokio::test]
    async fn raw_mode_returns_exactly_expected_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = vec![0u8; 1];
            socket.read_exact(&mut request).await.expect("request");
            assert_eq!(request[0], 0x05);
            socket.write_all(&[0xa5, 0x99]).await.expect("ack");
        });

        let client = GatewayClient::new(endpoint(port, 1000));
        let ack = client.transact_raw(&[0x05], 1, None).await.expect("ack");
        assert_eq!(ack, vec![0xa5]);
    }

    #[tokio::test]
    async fn silent_gateway_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept");
            // 不应答也不关闭，等客户端超时
            tokio::time::sleep(Duration::from_millis(500)).await;
        });

        let client = GatewayClient::new(endpoint(port, 80));
        let err = client
            .transact_frame(&Frame::poll(1), None)
            .await
            .expect_err("timeout");
        assert!(matches!(err, ProtocolError::Timeout(80)));
    }

    #[tokio::test]
    async fn caller_override_only_tightens_deadline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_millis(500)).await;
        });

        let client = GatewayClient::new(endpoint(port, 60));
        let err = client
            .transact_frame(&Frame::poll(1), Some(5000))
            .await
            .expect_err("timeout");
        assert!(matches!(err, ProtocolError::Timeout(60)));
    }

    #[tokio::test]
    async fn early_close_without_frame_is_protocol_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = vec![0u8; FRAME_LEN];
            socket.read_exact(&mut request).await.expect("request");
            socket.write_all(&[0x49, 0x01, 0x02]).await.expect("stub");
            // 连接随 drop 关闭
        });

        let client = GatewayClient::new(endpoint(port, 1000));
        let err = client
            .transact_frame(&Frame::poll(1), None)
            .await
            .expect_err("bad frame");
        assert!(matches!(err, ProtocolError::BadFrame));
    }

    #[tokio::test]
    async fn early_close_in_raw_mode_is_no_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = vec![0u8; 1];
            socket.read_exact(&mut request).await.expect("request");
        });

        let client = GatewayClient::new(endpoint(port, 1000));
        let err = client
            .transact_raw(&[0x05], 1, None)
            .await
            .expect_err("no reply");
        assert!(matches!(err, ProtocolError::NoReply));
    }

    #[tokio::test]
    async fn refused_connection_surfaces_io_error() {
        // 端口刚释放，连接应当被拒绝
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let client = GatewayClient::new(endpoint(port, 1000));
        let err = client
            .transact_frame(&Frame::poll(1), None)
            .await
            .expect_err("refused");
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
