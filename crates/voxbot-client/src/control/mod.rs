//! 控制模块
//!
//! - `MovementTrajectory` / `get_movement_frames` - 移动轨迹合成（含跳跃）
//! - `get_look_frames` - 视角帧
//! - `get_desired_yaw` - 目标方位
//! - `MotionController` - 闭环视角控制与开环移动/挖掘

pub mod bearing;
pub mod controller;
pub mod trajectory;

pub use bearing::get_desired_yaw;
pub use controller::{ActionOutcome, MotionController};
pub use trajectory::{MovementTrajectory, get_look_frames, get_movement_frames};
