//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub static_dir: String,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_host = env::var("DOMO_HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let http_port = read_port("PORT", 8080)?;
        let data_dir = env::var("DOMO_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let static_dir = env::var("DOMO_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        Ok(Self {
            http_host,
            http_port,
            data_dir,
            static_dir,
        })
    }
}

/// 读取监听端口，钳到 [1, 65535]。
fn read_port(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    let parsed = value
        .parse::<i64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))?;
    Ok(parsed.clamp(1, 65535) as u16)
}
