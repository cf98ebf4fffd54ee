//! 运动控制器
//!
//! 每个请求运行一次独立的控制循环，除了局部变量（目标朝向、已用时间）外不持有状态。
//!
//! # 状态机
//!
//! ```text
//! Idle ──► Stepping ──┬──► Converged   (视角进入容差带)
//!                     └──► TimedOut    (look_timeout 内未收敛)
//! ```
//!
//! - **视角**：闭环。每个控制周期读取位姿、比较、发送一帧、睡眠一个周期。
//!   睡眠总是完整的一个周期，收敛检测的粒度就是控制周期。
//! - **移动**：开环。一次性合成全部帧并按顺序发送，不对照观测位姿校验。
//! - **挖掘**：发送一条开始挖掘命令，固定等待后直接报告完成，不校验方块是否被移除。

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn};
use voxbot_driver::{CommandPublisher, PoseStore};
use voxbot_protocol::{
    DigCommand, MotionCommand, Pose, ToleranceBand, clamp_pitch, normalize_yaw,
};

use super::bearing::get_desired_yaw;
use super::trajectory::{MovementTrajectory, get_look_frames};
use crate::clock::Clock;
use crate::config::ControllerConfig;
use crate::error::ClientError;

/// 控制周期下限，避免零周期导致视角循环无法结束
const MIN_CONTROL_PERIOD: Duration = Duration::from_millis(1);

/// 动作结果
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// 视角进入容差带
    Converged {
        /// 收敛前发送的视角帧数
        ticks: u32,
    },
    /// 视角在超时内未收敛
    TimedOut {
        /// 发送的视角帧数
        ticks: u32,
    },
    /// 移动/挖掘命令全部发送完毕
    Completed {
        /// 发送的命令数
        frames: usize,
    },
    /// 输入非法（非有限值、负距离）
    InvalidInput(String),
}

impl ActionOutcome {
    /// 是否视为成功（对外映射为 `true`）
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Converged { .. } | ActionOutcome::Completed { .. }
        )
    }
}

/// 运动控制器
pub struct MotionController {
    store: Arc<PoseStore>,
    publisher: CommandPublisher,
    clock: Arc<dyn Clock>,
    config: ControllerConfig,
}

impl MotionController {
    pub fn new(
        store: Arc<PoseStore>,
        publisher: CommandPublisher,
        clock: Arc<dyn Clock>,
        config: ControllerConfig,
    ) -> Self {
        MotionController {
            store,
            publisher,
            clock,
            config,
        }
    }

    /// 控制器配置
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// 共享的位姿存储
    pub fn store(&self) -> &Arc<PoseStore> {
        &self.store
    }

    /// 转向绝对朝向
    pub fn handle_look(&self, pitch: f64, yaw: f64) -> Result<ActionOutcome, ClientError> {
        let _span = info_span!("look", pitch, yaw).entered();

        if let Some(outcome) = reject_non_finite(&[("pitch", pitch), ("yaw", yaw)]) {
            return Ok(outcome);
        }

        self.converge(clamp_pitch(pitch), normalize_yaw(yaw))
    }

    /// 相对当前朝向转动
    ///
    /// 目标朝向只在请求开始时计算一次：`pitch - Δpitch`，`yaw + Δyaw`
    /// （俯仰取减号，-90 为仰视）。
    pub fn handle_relative_look(
        &self,
        delta_pitch: f64,
        delta_yaw: f64,
    ) -> Result<ActionOutcome, ClientError> {
        let _span = info_span!("relative_look", delta_pitch, delta_yaw).entered();

        if let Some(outcome) =
            reject_non_finite(&[("delta_pitch", delta_pitch), ("delta_yaw", delta_yaw)])
        {
            return Ok(outcome);
        }

        let pose = self.current_pose()?;
        let (pitch, yaw) = relative_target(&pose, delta_pitch, delta_yaw);
        self.converge(pitch, yaw)
    }

    /// 走向目标点 `(x, z)`
    pub fn handle_move(&self, x: f64, z: f64, jump: bool) -> Result<ActionOutcome, ClientError> {
        let _span = info_span!("move", x, z, jump).entered();

        if let Some(outcome) = reject_non_finite(&[("x", x), ("z", z)]) {
            return Ok(outcome);
        }

        let pose = self.current_pose()?;
        let distance = pose.planar_distance_to(x, z);
        if distance == 0.0 {
            debug!("Target equals current position, nothing to publish");
            return Ok(ActionOutcome::Completed { frames: 0 });
        }

        match get_desired_yaw(pose.x, pose.z, x, z) {
            Some(direction) if distance.is_finite() => {
                self.publish_movement(&pose, direction, distance, jump)
            },
            _ => {
                warn!(distance, "Rejected move with unrepresentable distance");
                Ok(ActionOutcome::InvalidInput(format!(
                    "distance from ({}, {}) to ({x}, {z}) is not finite",
                    pose.x, pose.z
                )))
            },
        }
    }

    /// 沿 `direction` 移动 `distance`
    pub fn handle_relative_move(
        &self,
        direction: f64,
        distance: f64,
        jump: bool,
    ) -> Result<ActionOutcome, ClientError> {
        let _span = info_span!("relative_move", direction, distance, jump).entered();

        if let Some(outcome) =
            reject_non_finite(&[("direction", direction), ("distance", distance)])
        {
            return Ok(outcome);
        }
        if distance < 0.0 {
            warn!(distance, "Rejected negative move distance");
            return Ok(ActionOutcome::InvalidInput(format!(
                "distance must be non-negative, got {distance}"
            )));
        }

        let pose = self.current_pose()?;
        self.publish_movement(&pose, normalize_yaw(direction), distance, jump)
    }

    /// 挖掘方块 `(x, y, z)`
    ///
    /// 发送一条开始挖掘命令（顶面），等待 `dig_duration` 后报告完成。
    pub fn handle_dig(&self, x: i32, y: i32, z: i32) -> Result<ActionOutcome, ClientError> {
        let _span = info_span!("dig", x, y, z).entered();

        self.publisher.publish_dig(DigCommand::start(x, y, z))?;
        self.clock.sleep(self.config.dig_duration);

        info!("Dig command issued");
        Ok(ActionOutcome::Completed { frames: 1 })
    }

    /// 视角闭环
    fn converge(&self, target_pitch: f64, target_yaw: f64) -> Result<ActionOutcome, ClientError> {
        let band = ToleranceBand::new(self.config.tolerance_ratio);
        let period = self.config.control_period.max(MIN_CONTROL_PERIOD);
        let mut elapsed = Duration::ZERO;
        let mut ticks = 0u32;

        while elapsed < self.config.look_timeout {
            let pose = self.current_pose()?;
            if band.contains_orientation(pose.pitch, pose.yaw, target_pitch, target_yaw) {
                info!(ticks, "Look converged");
                return Ok(ActionOutcome::Converged { ticks });
            }

            for frame in get_look_frames(&pose, target_pitch, target_yaw) {
                self.publisher.publish_motion(MotionCommand::from(&frame))?;
            }
            ticks += 1;

            elapsed += period;
            self.clock.sleep(period);
        }

        warn!(
            ticks,
            target_pitch,
            target_yaw,
            timeout_ms = self.config.look_timeout.as_millis() as u64,
            "Look did not converge"
        );
        Ok(ActionOutcome::TimedOut { ticks })
    }

    /// 合成并发送移动帧
    fn publish_movement(
        &self,
        pose: &Pose,
        direction: f64,
        distance: f64,
        jump: bool,
    ) -> Result<ActionOutcome, ClientError> {
        let trajectory =
            MovementTrajectory::new(*pose, direction, distance, self.config.speed, jump);
        let total = trajectory.total_ticks();
        if total > self.config.max_move_frames {
            warn!(
                distance,
                frames = total,
                max = self.config.max_move_frames,
                "Rejected move exceeding frame limit"
            );
            return Ok(ActionOutcome::InvalidInput(format!(
                "distance {distance} needs {total} frames, limit is {}",
                self.config.max_move_frames
            )));
        }
        debug!(direction, distance, frames = total, "Publishing movement frames");

        for frame in trajectory {
            self.publisher.publish_motion(MotionCommand::from(&frame))?;
        }

        info!(frames = total, "Movement published");
        Ok(ActionOutcome::Completed { frames: total })
    }

    fn current_pose(&self) -> Result<Pose, ClientError> {
        self.store.read().ok_or(ClientError::PoseUnavailable)
    }
}

/// 相对视角的目标朝向（已限幅/归一化）
pub(crate) fn relative_target(pose: &Pose, delta_pitch: f64, delta_yaw: f64) -> (f64, f64) {
    (
        clamp_pitch(pose.pitch - delta_pitch),
        normalize_yaw(pose.yaw + delta_yaw),
    )
}

fn reject_non_finite(values: &[(&str, f64)]) -> Option<ActionOutcome> {
    values
        .iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, value)| {
            warn!(field = *name, value = *value, "Rejected non-finite input");
            ActionOutcome::InvalidInput(format!("{name} must be finite, got {value}"))
        })
}
