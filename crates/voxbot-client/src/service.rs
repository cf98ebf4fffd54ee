//! 动作服务
//!
//! 面向外部目标选择系统的同步请求接口，一对一映射到 `MotionController` 操作：
//!
//! | 操作 | 输入 | 输出 |
//! |---|---|---|
//! | `set_look` | pitch, yaw | bool |
//! | `set_relative_look` | Δpitch, Δyaw | bool |
//! | `set_move` | x, z, jump | bool |
//! | `set_relative_move` | direction, distance, jump | bool |
//! | `set_dig` | x, y, z | bool |
//!
//! 请求在互斥锁内串行执行：同一时刻只有一个动作在读取位姿和发送命令。
//! 错误不会越过 `bool` 接口，只记录日志；需要细分结果时使用 [`ActionService::execute`]。

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use voxbot_driver::{DriverError, PoseStore};
use voxbot_protocol::Pose;

use crate::control::{ActionOutcome, MotionController};
use crate::error::ClientError;

/// 动作请求
///
/// JSON 形式以 `action` 字段区分：
///
/// ```json
/// {"action": "look", "pitch": 0.0, "yaw": 90.0}
/// {"action": "relative_move", "direction": -90.0, "distance": 2.0, "jump": true}
/// {"action": "dig", "x": 1, "y": 63, "z": 4}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRequest {
    Look {
        pitch: f64,
        yaw: f64,
    },
    RelativeLook {
        pitch: f64,
        yaw: f64,
    },
    Move {
        x: f64,
        z: f64,
        #[serde(default)]
        jump: bool,
    },
    RelativeMove {
        direction: f64,
        distance: f64,
        #[serde(default)]
        jump: bool,
    },
    Dig {
        x: i32,
        y: i32,
        z: i32,
    },
}

impl ActionRequest {
    /// 操作名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            ActionRequest::Look { .. } => "set_look",
            ActionRequest::RelativeLook { .. } => "set_relative_look",
            ActionRequest::Move { .. } => "set_move",
            ActionRequest::RelativeMove { .. } => "set_relative_move",
            ActionRequest::Dig { .. } => "set_dig",
        }
    }
}

/// 动作服务
pub struct ActionService {
    controller: Mutex<MotionController>,
    store: Arc<PoseStore>,
    first_pose_poll: Duration,
}

impl ActionService {
    pub fn new(controller: MotionController) -> Self {
        let store = controller.store().clone();
        let first_pose_poll = controller.config().first_pose_poll;
        ActionService {
            controller: Mutex::new(controller),
            store,
            first_pose_poll,
        }
    }

    /// 阻塞等待第一个位姿
    ///
    /// 每 `first_pose_poll` 检查一次。在此之前提交的移动/视角请求会因
    /// 没有位姿而失败。
    pub fn wait_until_ready(&self, timeout: Duration) -> Result<Pose, ClientError> {
        self.store
            .wait_for_pose(timeout, self.first_pose_poll)
            .map_err(|e| match e {
                DriverError::PoseTimeout { timeout_ms } => ClientError::NotReady { timeout_ms },
                other => ClientError::Driver(other),
            })
    }

    /// 是否已观测到位姿
    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// 执行请求并返回详细结果
    pub fn execute(&self, request: ActionRequest) -> Result<ActionOutcome, ClientError> {
        let controller = self.controller.lock();
        match request {
            ActionRequest::Look { pitch, yaw } => controller.handle_look(pitch, yaw),
            ActionRequest::RelativeLook { pitch, yaw } => {
                controller.handle_relative_look(pitch, yaw)
            },
            ActionRequest::Move { x, z, jump } => controller.handle_move(x, z, jump),
            ActionRequest::RelativeMove {
                direction,
                distance,
                jump,
            } => controller.handle_relative_move(direction, distance, jump),
            ActionRequest::Dig { x, y, z } => controller.handle_dig(x, y, z),
        }
    }

    /// 执行请求，结果折叠为 `bool`
    pub fn dispatch(&self, request: ActionRequest) -> bool {
        let name = request.name();
        match self.execute(request) {
            Ok(outcome) => {
                let success = outcome.is_success();
                if success {
                    info!(action = name, ?outcome, "Action succeeded");
                } else {
                    warn!(action = name, ?outcome, "Action failed");
                }
                success
            },
            Err(e) => {
                warn!(action = name, error = %e, "Action aborted");
                false
            },
        }
    }

    pub fn set_look(&self, pitch: f64, yaw: f64) -> bool {
        self.dispatch(ActionRequest::Look { pitch, yaw })
    }

    pub fn set_relative_look(&self, delta_pitch: f64, delta_yaw: f64) -> bool {
        self.dispatch(ActionRequest::RelativeLook {
            pitch: delta_pitch,
            yaw: delta_yaw,
        })
    }

    pub fn set_move(&self, x: f64, z: f64, jump: bool) -> bool {
        self.dispatch(ActionRequest::Move { x, z, jump })
    }

    pub fn set_relative_move(&self, direction: f64, distance: f64, jump: bool) -> bool {
        self.dispatch(ActionRequest::RelativeMove {
            direction,
            distance,
            jump,
        })
    }

    pub fn set_dig(&self, x: i32, y: i32, z: i32) -> bool {
        self.dispatch(ActionRequest::Dig { x, y, z })
    }
}
