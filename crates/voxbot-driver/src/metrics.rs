//! 驱动层指标
//!
//! 原子计数器，可在任何线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 驱动层实时指标
///
/// # 使用示例
///
/// ```rust
/// use voxbot_driver::DriverMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = DriverMetrics::new();
/// metrics.poses_observed.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.poses_observed, 1);
/// ```
#[derive(Debug, Default)]
pub struct DriverMetrics {
    /// 观察器处理的位姿更新数
    pub poses_observed: AtomicU64,

    /// 已发送的运动命令数
    pub motion_commands: AtomicU64,

    /// 已发送的相机快照数
    pub camera_snapshots: AtomicU64,

    /// 已发送的挖掘命令数
    pub dig_commands: AtomicU64,

    /// 传输层拒绝的消息数
    pub sink_errors: AtomicU64,
}

impl DriverMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            poses_observed: self.poses_observed.load(Ordering::Relaxed),
            motion_commands: self.motion_commands.load(Ordering::Relaxed),
            camera_snapshots: self.camera_snapshots.load(Ordering::Relaxed),
            dig_commands: self.dig_commands.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.poses_observed.store(0, Ordering::Relaxed);
        self.motion_commands.store(0, Ordering::Relaxed);
        self.camera_snapshots.store(0, Ordering::Relaxed);
        self.dig_commands.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub poses_observed: u64,
    pub motion_commands: u64,
    pub camera_snapshots: u64,
    pub dig_commands: u64,
    pub sink_errors: u64,
}

impl MetricsSnapshot {
    /// 出站消息总数（不含失败）
    pub fn outbound_total(&self) -> u64 {
        self.motion_commands + self.camera_snapshots + self.dig_commands
    }
}
