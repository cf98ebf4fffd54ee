//! 模拟化身
//!
//! 回环传输：把出站运动命令直接作用到内部位姿上，再以 `PoseUpdate`
//! 的形式送回观察器通道，代替真实的游戏客户端。
//!
//! ```text
//! MotionCommand ──► SimulatedAvatar ──► PoseUpdate ──► StateObserver
//! ```
//!
//! 可以限制每条命令的最大转向角，用于模拟视角逐步转动的客户端。
//! 挖掘命令只做录制；相机快照只计数，不保留内容。

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;
use voxbot_protocol::{MotionCommand, Outbound, Pose, PoseUpdate, clamp_pitch, normalize_yaw};

use crate::{CommandSink, DriverError};

/// 模拟化身配置
#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    /// 初始位姿
    pub start: Pose,
    /// 每条运动命令的最大转向角（度），`None` 表示立即到位
    pub max_turn_per_command_deg: Option<f64>,
}

/// 模拟化身
pub struct SimulatedAvatar {
    pose: Mutex<Pose>,
    max_turn: Option<f64>,
    pose_tx: Sender<PoseUpdate>,
    outbound: Mutex<Vec<Outbound>>,
    camera_snapshots: AtomicU64,
}

impl SimulatedAvatar {
    pub fn new(config: SimulatorConfig, pose_tx: Sender<PoseUpdate>) -> Self {
        SimulatedAvatar {
            pose: Mutex::new(config.start),
            max_turn: config.max_turn_per_command_deg.map(f64::abs),
            pose_tx,
            outbound: Mutex::new(Vec::new()),
            camera_snapshots: AtomicU64::new(0),
        }
    }

    /// 发送当前位姿（模拟客户端登录后的第一条位置更新）
    pub fn announce(&self) -> Result<(), DriverError> {
        let pose = *self.pose.lock();
        self.send_update(&pose)
    }

    /// 当前模拟位姿
    pub fn pose(&self) -> Pose {
        *self.pose.lock()
    }

    /// 收到的运动和挖掘命令（按到达顺序，不含相机快照）
    pub fn received(&self) -> Vec<Outbound> {
        self.outbound.lock().clone()
    }

    /// 收到的运动命令数
    pub fn motion_count(&self) -> usize {
        self.outbound
            .lock()
            .iter()
            .filter(|m| matches!(m, Outbound::Motion(_)))
            .count()
    }

    /// 收到的相机快照数
    pub fn camera_count(&self) -> u64 {
        self.camera_snapshots.load(Ordering::Relaxed)
    }

    fn apply_motion(&self, cmd: &MotionCommand) -> Pose {
        let mut pose = self.pose.lock();
        pose.x = cmd.x;
        pose.y = cmd.y;
        pose.z = cmd.z;
        pose.pitch = clamp_pitch(step_towards(pose.pitch, cmd.pitch, self.max_turn));
        pose.yaw = normalize_yaw(step_towards(
            pose.yaw,
            pose.yaw + shortest_yaw_delta(pose.yaw, cmd.yaw),
            self.max_turn,
        ));
        *pose
    }

    fn send_update(&self, pose: &Pose) -> Result<(), DriverError> {
        self.pose_tx
            .send(PoseUpdate::from(pose))
            .map_err(|_| DriverError::ChannelClosed)
    }
}

impl CommandSink for SimulatedAvatar {
    fn publish(&self, message: Outbound) -> Result<(), DriverError> {
        match message {
            Outbound::Camera(_) => {
                self.camera_snapshots.fetch_add(1, Ordering::Relaxed);
            },
            Outbound::Motion(cmd) => {
                self.outbound.lock().push(message);
                let pose = self.apply_motion(&cmd);
                trace!(x = pose.x, z = pose.z, yaw = pose.yaw, "Simulated avatar moved");
                self.send_update(&pose)?;
            },
            Outbound::Dig(_) => self.outbound.lock().push(message),
        }
        Ok(())
    }
}

/// 从 `from` 到 `to` 的最短偏航差，落在 `(-180, 180]`
fn shortest_yaw_delta(from: f64, to: f64) -> f64 {
    normalize_yaw(to - from)
}

/// 向目标前进，单步不超过 `max_step`
fn step_towards(current: f64, target: f64, max_step: Option<f64>) -> f64 {
    match max_step {
        Some(limit) => current + (target - current).clamp(-limit, limit),
        None => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn motion(x: f64, pitch: f64, yaw: f64) -> MotionCommand {
        MotionCommand {
            x,
            y: 64.0,
            z: 0.0,
            pitch,
            yaw,
            jump: false,
        }
    }

    #[test]
    fn test_announce_sends_start_pose() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let avatar = SimulatedAvatar::new(
            SimulatorConfig {
                start: Pose::new(1.0, 64.0, 2.0, 0.0, 45.0),
                max_turn_per_command_deg: None,
            },
            tx,
        );

        avatar.announce().unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.x, 1.0);
        assert_eq!(update.yaw, 45.0);
    }

    #[test]
    fn test_motion_applied_immediately() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let avatar = SimulatedAvatar::new(SimulatorConfig::default(), tx);

        avatar.publish(Outbound::Motion(motion(3.0, -20.0, 90.0))).unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.x, 3.0);
        assert_eq!(update.pitch, -20.0);
        assert_eq!(update.yaw, 90.0);
        assert_eq!(avatar.motion_count(), 1);
    }

    #[test]
    fn test_turn_limit_takes_shortest_path() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let avatar = SimulatedAvatar::new(
            SimulatorConfig {
                start: Pose::new(0.0, 0.0, 0.0, 0.0, 170.0),
                max_turn_per_command_deg: Some(15.0),
            },
            tx,
        );

        // 170 → -170 的最短路径是 +20，跨越 180
        avatar.publish(Outbound::Motion(motion(0.0, 0.0, -170.0))).unwrap();
        assert_relative_eq!(avatar.pose().yaw, -175.0, epsilon = 1e-9);

        avatar.publish(Outbound::Motion(motion(0.0, 0.0, -170.0))).unwrap();
        assert_relative_eq!(avatar.pose().yaw, -170.0, epsilon = 1e-9);
    }

    #[test]
    fn test_camera_counted_and_dig_recorded() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let avatar = SimulatedAvatar::new(SimulatorConfig::default(), tx);

        avatar
            .publish(Outbound::Dig(voxbot_protocol::DigCommand::start(1, 2, 3)))
            .unwrap();
        assert!(rx.try_recv().is_err());
        for _ in 0..50 {
            avatar
                .publish(Outbound::Camera(voxbot_protocol::CameraSnapshot::from(
                    &Pose::default(),
                )))
                .unwrap();
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(avatar.received().len(), 1);
        assert_eq!(avatar.camera_count(), 50);
        assert_eq!(avatar.pose(), Pose::default());
    }

    #[test]
    fn test_closed_channel_reported() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let avatar = SimulatedAvatar::new(SimulatorConfig::default(), tx);
        let err = avatar.publish(Outbound::Motion(motion(1.0, 0.0, 0.0))).unwrap_err();
        assert!(matches!(err, DriverError::ChannelClosed));
    }
}
