//! # Voxbot Protocol
//!
//! 虚拟世界中化身（avatar）运动控制的数据定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `pose`: 位姿 `Pose` 与运动帧 `Frame`
//! - `angle`: 偏航角归一化、俯仰角限幅、容差带
//! - `constants`: 物理常量与速度档位
//! - `messages`: 对外消息（`PoseUpdate` / `MotionCommand` / `CameraSnapshot` / `DigCommand`）
//! - `codec`: JSON-line 编解码（需要 `serde` feature）
//!
//! ## 角度约定
//!
//! 沿用游戏客户端的约定：
//! - yaw（偏航）单位为度，归一化到 `(-180, 180]`，yaw = 0 朝向 +z，yaw = -90 朝向 +x
//! - pitch（俯仰）单位为度，限幅到 `[-90, 90]`，-90 为仰视，90 为俯视

pub mod angle;
#[cfg(feature = "serde")]
pub mod codec;
pub mod constants;
pub mod messages;
pub mod pose;

// 重新导出常用类型
pub use angle::*;
pub use constants::*;
pub use messages::*;
pub use pose::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: &'static str, value: u8 },

    #[error("Non-finite value for field {field}")]
    NonFinite { field: &'static str },

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::ParseError(err.to_string())
    }
}

/// 检查浮点字段是否有限（非 NaN / 非 Inf）
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ProtocolError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProtocolError::NonFinite { field })
    }
}
