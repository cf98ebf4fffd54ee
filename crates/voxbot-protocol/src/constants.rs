//! 物理常量与速度档位
//!
//! 步长单位为方块/tick（client tick），取自游戏客户端物理模型的近似值：
//! 地面加速度并非线性，这里按匀速处理。

use crate::ProtocolError;

/// 步行每 tick 位移（方块）
pub const PLAYER_WALK_STEP: f64 = 0.15;

/// 疾跑每 tick 位移（方块）
pub const PLAYER_SPRINT_STEP: f64 = 0.20;

/// 跳跃上升阶段每 tick 升高（方块）
pub const JUMP_RISE_PER_TICK: f64 = 0.45;

/// 跳跃顶点相对起跳高度的偏移（方块）
pub const JUMP_PEAK_OFFSET: f64 = 1.35;

/// 跳跃下落阶段每 tick 下降（方块），与玩家实体重力加速度一致
pub const JUMP_FALL_PER_TICK: f64 = 0.08;

/// 俯仰角下限（度，仰视）
pub const PITCH_MIN: f64 = -90.0;

/// 俯仰角上限（度，俯视）
pub const PITCH_MAX: f64 = 90.0;

/// 速度档位
///
/// 档位越高，每 tick 步长越大。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum SpeedLevel {
    /// 步行（默认）
    #[default]
    Walk = 1,
    /// 疾跑
    Sprint = 2,
}

impl SpeedLevel {
    /// 每 tick 步长（方块）
    pub fn step_distance(self) -> f64 {
        match self {
            SpeedLevel::Walk => PLAYER_WALK_STEP,
            SpeedLevel::Sprint => PLAYER_SPRINT_STEP,
        }
    }

    /// 从原始档位值解析
    pub fn from_level(level: u8) -> Result<Self, ProtocolError> {
        Self::try_from(level).map_err(|_| ProtocolError::InvalidValue {
            field: "speed_level",
            value: level,
        })
    }
}
