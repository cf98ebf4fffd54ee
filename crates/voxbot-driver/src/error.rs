//! 驱动层错误类型定义

use thiserror::Error;
use voxbot_protocol::ProtocolError;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 协议编解码错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 出站通道已关闭（传输层退出）
    #[error("Command channel closed")]
    ChannelClosed,

    /// 出站通道已满
    #[error("Command channel full (capacity: {capacity})")]
    ChannelFull { capacity: usize },

    /// 后台线程错误
    #[error("IO thread error: {0}")]
    IoThread(String),

    /// 等待位姿超时
    #[error("Timed out after {timeout_ms}ms waiting for the first pose")]
    PoseTimeout { timeout_ms: u64 },

    /// 传输层拒绝消息
    #[error("Transport rejected message: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::DriverError;
    use voxbot_protocol::ProtocolError;

    #[test]
    fn test_driver_error_display() {
        let msg = format!("{}", DriverError::ChannelClosed);
        assert_eq!(msg, "Command channel closed");

        let msg = format!("{}", DriverError::ChannelFull { capacity: 10 });
        assert!(msg.contains("channel full") && msg.contains("10"));

        let msg = format!("{}", DriverError::PoseTimeout { timeout_ms: 1500 });
        assert!(msg.contains("1500ms"));

        let msg = format!("{}", DriverError::IoThread("spawn failed".to_string()));
        assert!(msg.contains("IO thread") && msg.contains("spawn failed"));
    }

    #[test]
    fn test_from_protocol_error() {
        let protocol_error = ProtocolError::NonFinite { field: "yaw" };
        let driver_error: DriverError = protocol_error.into();
        match driver_error {
            DriverError::Protocol(ProtocolError::NonFinite { field }) => assert_eq!(field, "yaw"),
            other => panic!("Expected Protocol variant, got {:?}", other),
        }
    }
}
