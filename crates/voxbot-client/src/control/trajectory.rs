//! 轨迹合成
//!
//! 把起始位姿 + 运动目标展开为按 tick 排列的有限帧序列。
//!
//! # 移动
//!
//! 每 tick 沿 `direction` 前进一个步长（游戏偏航约定：0° 朝 +z，-90° 朝 +x）：
//!
//! ```text
//! dx = -step·sin(direction)
//! dz =  step·cos(direction)
//! ```
//!
//! 第 n 帧（从 1 开始）在 `(n-1)·step < distance` 时产生，因此帧数为
//! `ceil(distance / step)`，距离为 0 时序列为空。
//!
//! # 跳跃
//!
//! ```text
//! Rising ──(到达顶点)──► Falling ──(回到起跳高度)──► Landed
//! ```
//!
//! 上升阶段每 tick 升高 0.45 直到起跳高度 + 1.35，下落阶段每 tick 下降 0.08
//! 并钳制在起跳高度。着地后高度和着地标志回到起始位姿的值。
//!
//! # 特性
//!
//! - **Iterator 模式**: 按需生成帧，可 `reset()` 重放
//! - **确定性**: 相同输入总是产生相同序列，调用之间不共享状态

use voxbot_protocol::{
    Frame, JUMP_FALL_PER_TICK, JUMP_PEAK_OFFSET, JUMP_RISE_PER_TICK, Pose, SpeedLevel,
};

/// f64 可精确表示的最大连续整数（2^53）
const EXACT_TICK_LIMIT: f64 = 9_007_199_254_740_992.0;

/// 跳跃阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpPhase {
    Rising,
    Falling,
    Landed,
}

/// 移动轨迹
///
/// # 示例
///
/// ```rust
/// use voxbot_client::control::MovementTrajectory;
/// use voxbot_protocol::{Pose, SpeedLevel};
///
/// let start = Pose::new(0.0, 64.0, 0.0, 0.0, 0.0);
/// let trajectory = MovementTrajectory::new(start, 0.0, 1.5, SpeedLevel::Walk, false);
/// assert_eq!(trajectory.total_ticks(), 10);
///
/// let last = trajectory.last().unwrap();
/// assert!((last.z - 1.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct MovementTrajectory {
    start: Pose,
    dx: f64,
    dz: f64,
    jump: bool,
    total_ticks: usize,
    current_index: usize,
    y: f64,
    on_ground: bool,
    phase: JumpPhase,
}

impl MovementTrajectory {
    /// 创建移动轨迹
    ///
    /// `distance` 为负或非有限值时按 0 处理（空轨迹）。
    pub fn new(
        start: Pose,
        direction_deg: f64,
        distance: f64,
        speed: SpeedLevel,
        jump: bool,
    ) -> Self {
        let step = speed.step_distance();
        let (sin, cos) = direction_deg.to_radians().sin_cos();
        let distance = if distance.is_finite() { distance.max(0.0) } else { 0.0 };

        let mut trajectory = MovementTrajectory {
            start,
            dx: -step * sin,
            dz: step * cos,
            jump,
            total_ticks: Self::count_ticks(distance, step),
            current_index: 0,
            y: start.y,
            on_ground: start.on_ground,
            phase: JumpPhase::Landed,
        };
        trajectory.reset();
        trajectory
    }

    /// 满足 `(n-1)·step < distance` 的最大 n
    ///
    /// 超出 f64 精确整数范围时不再逐帧修正，结果饱和到 `usize::MAX`。
    fn count_ticks(distance: f64, step: f64) -> usize {
        let estimate = (distance / step).ceil();
        if estimate >= EXACT_TICK_LIMIT {
            return estimate as usize;
        }

        let mut ticks = estimate as usize;
        // 修正浮点舍入，保证与逐帧判定一致
        while ticks > 0 && (ticks - 1) as f64 * step >= distance {
            ticks -= 1;
        }
        while (ticks as f64) * step < distance {
            ticks = ticks.saturating_add(1);
        }
        ticks
    }

    /// 重置到起点
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.y = self.start.y;
        self.on_ground = self.start.on_ground;
        self.phase = if self.jump {
            JumpPhase::Rising
        } else {
            JumpPhase::Landed
        };
    }

    /// 总帧数
    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    /// 当前进度（0.0 到 1.0）
    pub fn progress(&self) -> f64 {
        if self.total_ticks == 0 {
            1.0
        } else {
            (self.current_index as f64) / (self.total_ticks as f64)
        }
    }

    /// 推进跳跃状态机一个 tick
    fn step_vertical(&mut self) {
        let base = self.start.y;
        match self.phase {
            JumpPhase::Rising => {
                let peak = base + JUMP_PEAK_OFFSET;
                self.on_ground = false;
                self.y = (self.y + JUMP_RISE_PER_TICK).min(peak);
                if self.y >= peak {
                    self.phase = JumpPhase::Falling;
                }
            },
            JumpPhase::Falling => {
                self.y = (self.y - JUMP_FALL_PER_TICK).max(base);
                if self.y <= base {
                    self.on_ground = true;
                    self.phase = JumpPhase::Landed;
                }
            },
            JumpPhase::Landed => {
                self.y = base;
                self.on_ground = self.start.on_ground;
            },
        }
    }
}

impl Iterator for MovementTrajectory {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.total_ticks {
            return None;
        }

        self.current_index += 1;
        let n = self.current_index as f64;
        self.step_vertical();

        Some(Frame {
            x: self.start.x + n * self.dx,
            y: self.y,
            z: self.start.z + n * self.dz,
            pitch: self.start.pitch,
            yaw: self.start.yaw,
            on_ground: self.on_ground,
            jump: self.jump,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_ticks - self.current_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MovementTrajectory {}

/// 生成移动帧序列
pub fn get_movement_frames(
    pose: &Pose,
    direction_deg: f64,
    distance: f64,
    speed: SpeedLevel,
    jump: bool,
) -> Vec<Frame> {
    MovementTrajectory::new(*pose, direction_deg, distance, speed, jump).collect()
}

/// 生成视角帧序列
///
/// 只返回一帧：当前位置 + 目标朝向，不做插值。平滑转动依赖控制器每个周期
/// 重复发送同一目标。
pub fn get_look_frames(pose: &Pose, pitch: f64, yaw: f64) -> Vec<Frame> {
    vec![Frame::from_pose(&pose.with_orientation(pitch, yaw), false)]
}
