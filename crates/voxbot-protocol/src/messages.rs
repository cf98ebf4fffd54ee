//! 对外消息定义
//!
//! ```text
//! 入站:  PoseUpdate       ── 传输层 → 状态观察器
//! 出站:  MotionCommand    ── 每个运动帧一条
//!        CameraSnapshot   ── 相机发布器每个周期一条
//!        DigCommand       ── 每个挖掘请求一条
//! ```

use crate::ProtocolError;
use crate::pose::{Frame, Pose};

/// 位姿更新（入站）
///
/// 不携带着地标志，观察器沿用上一次的值。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseUpdate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl PoseUpdate {
    /// 合并到位姿：覆盖位置与朝向，保留着地标志
    pub fn apply_to(&self, on_ground: bool) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            z: self.z,
            pitch: self.pitch,
            yaw: self.yaw,
            on_ground,
        }
    }
}

impl From<&Pose> for PoseUpdate {
    fn from(pose: &Pose) -> Self {
        PoseUpdate {
            x: pose.x,
            y: pose.y,
            z: pose.z,
            pitch: pose.pitch,
            yaw: pose.yaw,
        }
    }
}

/// 运动命令（出站）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionCommand {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub jump: bool,
}

impl From<&Frame> for MotionCommand {
    fn from(frame: &Frame) -> Self {
        MotionCommand {
            x: frame.x,
            y: frame.y,
            z: frame.z,
            pitch: frame.pitch,
            yaw: frame.yaw,
            jump: frame.jump,
        }
    }
}

/// 相机快照（出站）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl From<&Pose> for CameraSnapshot {
    fn from(pose: &Pose) -> Self {
        CameraSnapshot {
            x: pose.x,
            y: pose.y,
            z: pose.z,
            pitch: pose.pitch,
            yaw: pose.yaw,
        }
    }
}

/// 挖掘状态（协议序号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum DigStatus {
    /// 开始挖掘
    #[default]
    Start = 0,
    /// 取消挖掘
    Cancel = 1,
    /// 完成挖掘
    Finish = 2,
}

/// 方块面（协议序号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum BlockFace {
    /// -Y
    Bottom = 0,
    /// +Y
    #[default]
    Top = 1,
    /// -Z
    North = 2,
    /// +Z
    South = 3,
    /// -X
    West = 4,
    /// +X
    East = 5,
}

impl DigStatus {
    pub fn from_raw(value: u8) -> Result<Self, ProtocolError> {
        Self::try_from(value).map_err(|_| ProtocolError::InvalidValue {
            field: "dig_status",
            value,
        })
    }
}

impl BlockFace {
    pub fn from_raw(value: u8) -> Result<Self, ProtocolError> {
        Self::try_from(value).map_err(|_| ProtocolError::InvalidValue {
            field: "face",
            value,
        })
    }
}

/// 挖掘命令（出站）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DigCommand {
    /// 方块坐标
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub status: DigStatus,
    pub face: BlockFace,
}

impl DigCommand {
    /// 从顶面开始挖掘指定方块
    pub fn start(x: i32, y: i32, z: i32) -> Self {
        DigCommand {
            x,
            y,
            z,
            status: DigStatus::Start,
            face: BlockFace::Top,
        }
    }
}

/// 出站消息（统一类型，便于通道转发和录制）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Outbound {
    Motion(MotionCommand),
    Camera(CameraSnapshot),
    Dig(DigCommand),
}

impl Outbound {
    /// 消息类别名称（日志用）
    pub fn kind(&self) -> &'static str {
        match self {
            Outbound::Motion(_) => "motion",
            Outbound::Camera(_) => "camera",
            Outbound::Dig(_) => "dig",
        }
    }
}
