//! Voxbot SDK
//!
//! 驱动虚拟世界中的化身：转向、移动、挖掘。视角控制是闭环的（对照观测位姿
//! 反复发送直到进入容差带或超时），移动和挖掘是开环的。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 位姿、帧、出站消息、角度工具、JSON 行编解码
//! - **驱动层** (`driver`): 位姿存储、状态观察器、命令发送、相机发布器、模拟化身
//! - **客户端层** (`client`): 轨迹合成、运动控制器、动作服务、配置
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use voxbot_sdk::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), ClientError> {
//! voxbot_sdk::init_logger();
//!
//! let bot = VoxbotBuilder::new()
//!     .ready_timeout(Duration::from_secs(5))
//!     .build_simulated()?;
//!
//! assert!(bot.service().set_look(0.0, 90.0));
//! assert!(bot.service().set_move(3.0, 3.0, false));
//! # Ok(())
//! # }
//! ```

pub use voxbot_client as client;
pub use voxbot_driver as driver;
pub use voxbot_protocol as protocol;

pub mod prelude;

pub use client::{
    ActionOutcome, ActionRequest, ActionService, ClientError, ConfigError, MotionController,
    Voxbot, VoxbotBuilder, VoxbotConfig,
};
pub use driver::{CommandSink, DriverError};
pub use protocol::{Frame, Pose, ProtocolError};

use tracing_subscriber::EnvFilter;

/// 默认日志级别（未设置 `RUST_LOG` 时）
const DEFAULT_LOG_FILTER: &str = "info";

/// 初始化日志
///
/// 安装 `tracing-subscriber` 的 fmt 订阅器（`RUST_LOG` 过滤，默认 `info`），
/// 并把 `log` crate 的记录转发到 `tracing`。重复调用是无害的。
pub fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return;
    }
    if tracing_log::LogTracer::init().is_ok() {
        log::debug!("log records are forwarded to tracing");
    }
}
