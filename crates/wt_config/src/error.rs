// crates/wt_config/src/error.rs

//! 配置层错误类型

use wt_foundation::WtError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件不存在
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },
}

impl From<ConfigError> for WtError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => WtError::io_with_source("读取配置文件失败", e),
            ConfigError::NotFound(path) => WtError::not_found(path),
            ConfigError::Parse(msg) => WtError::malformed("config", msg),
            ConfigError::InvalidValue { key, value, reason } => {
                WtError::invalid_config(key, value, reason)
            }
        }
    }
}
