//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use voxbot_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use crate::client::{
    ActionOutcome, ActionRequest, ActionService, Clock, ManualClock, SystemClock, Voxbot,
    VoxbotBuilder, VoxbotConfig,
};

// 驱动层
pub use crate::driver::{CommandSink, RecordingSink, SimulatedAvatar};

// 协议层
pub use crate::protocol::{Frame, Outbound, Pose, PoseUpdate, SpeedLevel};

// 错误类型
pub use crate::client::ClientError;
pub use crate::driver::DriverError;
pub use crate::protocol::ProtocolError;
