//! 客户端接口模块
//!
//! 本模块提供 voxbot 化身的控制接口，包括：
//! - 轨迹合成（移动帧、视角帧、跳跃弧线）
//! - 运动控制器（视角闭环收敛、开环移动、挖掘）
//! - 动作服务（同步 `bool` 接口，请求串行执行）
//! - 运行配置（TOML）与时钟抽象
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的模块。如果需要自定义传输层，实现
//! [`voxbot_driver::CommandSink`] 并通过 [`VoxbotBuilder::build`] 接入。

pub mod builder;
pub mod clock;
pub mod config;
pub mod control;
mod error;
pub mod service;

pub use builder::{Voxbot, VoxbotBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CameraSettings, ControllerConfig, SimulatorSettings, VoxbotConfig};
pub use control::{
    ActionOutcome, MotionController, MovementTrajectory, get_desired_yaw, get_look_frames,
    get_movement_frames,
};
pub use error::{ClientError, ConfigError, Result};
pub use service::{ActionRequest, ActionService};
