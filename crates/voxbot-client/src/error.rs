//! 客户端错误类型
//!
//! 动作本身的结果（收敛、超时、非法输入）用 [`ActionOutcome`](crate::ActionOutcome)
//! 表达；这里只放阻止动作执行的基础设施错误。

use std::path::PathBuf;
use thiserror::Error;
use voxbot_driver::DriverError;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    /// 尚未观测到任何位姿
    #[error("No pose has been observed yet")]
    PoseUnavailable,

    /// 等待第一个位姿超时
    #[error("Timed out after {timeout_ms}ms waiting for the first pose")]
    NotReady {
        /// 超时时间（毫秒）
        timeout_ms: u64,
    },

    /// 驱动层错误（传输拒绝、线程创建失败等）
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 配置值非法
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ClientError>;
