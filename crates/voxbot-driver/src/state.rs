//! 位姿存储
//!
//! 只保存最近一次观测到的位姿（last-write-wins，不保留历史）。
//!
//! # 同步机制
//!
//! `ArcSwapOption`：写入方（状态观察器）整体替换，读取方（控制器、相机发布器）
//! 无锁加载并拿到副本，不会与写入方别名。
//!
//! ```text
//! ┌─────────────────┐
//! │    PoseStore    │
//! ├─────────────────┤
//! │ sample          │ ← ArcSwapOption<PoseSample>（None = 尚未观测）
//! └─────────────────┘
//! ```

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::{Duration, Instant};
use voxbot_protocol::Pose;

use crate::DriverError;

/// 带时间戳的位姿样本
#[derive(Debug, Clone, Copy)]
struct PoseSample {
    pose: Pose,
    updated_at: Instant,
}

/// 位姿存储
///
/// 进程启动时为空；第一次观测到达后才有效。
#[derive(Debug)]
pub struct PoseStore {
    sample: ArcSwapOption<PoseSample>,
}

impl PoseStore {
    /// 创建空存储
    pub fn new() -> Self {
        PoseStore {
            sample: ArcSwapOption::empty(),
        }
    }

    /// 创建带初始位姿的存储（测试和模拟用）
    pub fn with_pose(pose: Pose) -> Self {
        let store = Self::new();
        store.replace(pose);
        store
    }

    /// 读取当前位姿副本
    ///
    /// 尚未观测时返回 `None`。
    pub fn read(&self) -> Option<Pose> {
        self.sample.load_full().map(|sample| sample.pose)
    }

    /// 整体替换位姿
    pub fn replace(&self, pose: Pose) {
        self.sample.store(Some(Arc::new(PoseSample {
            pose,
            updated_at: Instant::now(),
        })));
    }

    /// 是否已观测到至少一个位姿
    pub fn is_ready(&self) -> bool {
        self.sample.load().is_some()
    }

    /// 最后更新时间
    pub fn last_update(&self) -> Option<Instant> {
        self.sample.load_full().map(|sample| sample.updated_at)
    }

    /// 检查位姿是否新鲜（`max_age` 内更新过）
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.last_update().is_some_and(|last| last.elapsed() < max_age)
    }

    /// 阻塞等待第一个位姿
    ///
    /// 每隔 `poll_interval` 检查一次，超时返回 `DriverError::PoseTimeout`。
    ///
    /// # 阻塞行为
    ///
    /// 此方法会阻塞当前线程，请不要在 `async` 上下文中直接调用。
    pub fn wait_for_pose(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Pose, DriverError> {
        let start = Instant::now();

        loop {
            if let Some(pose) = self.read() {
                return Ok(pose);
            }

            // 检查剩余时间，避免不必要的 sleep
            let remaining = timeout.saturating_sub(start.elapsed());
            let sleep_duration = poll_interval.min(remaining);

            if sleep_duration.is_zero() {
                return Err(DriverError::PoseTimeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            std::thread::sleep(sleep_duration);
        }
    }
}

impl Default for PoseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_store() {
        let store = PoseStore::new();
        assert!(store.read().is_none());
        assert!(!store.is_ready());
        assert!(store.last_update().is_none());
        assert!(!store.is_fresh(Duration::from_secs(1)));
    }

    #[test]
    fn test_replace_last_write_wins() {
        let store = PoseStore::new();
        store.replace(Pose::new(1.0, 2.0, 3.0, 0.0, 10.0));
        store.replace(Pose::new(4.0, 5.0, 6.0, 0.0, 20.0));

        let pose = store.read().unwrap();
        assert_eq!(pose.x, 4.0);
        assert_eq!(pose.yaw, 20.0);
        assert!(store.is_fresh(Duration::from_secs(1)));
    }

    #[test]
    fn test_read_returns_copy() {
        let store = PoseStore::with_pose(Pose::default());
        let mut copy = store.read().unwrap();
        copy.yaw = 90.0;
        assert_eq!(store.read().unwrap().yaw, 0.0);
    }

    #[test]
    fn test_wait_for_pose_timeout() {
        let store = PoseStore::new();
        let result = store.wait_for_pose(Duration::from_millis(30), Duration::from_millis(5));
        assert!(matches!(
            result,
            Err(DriverError::PoseTimeout { timeout_ms: 30 })
        ));
    }

    #[test]
    fn test_wait_for_pose_arrives_later() {
        let store = Arc::new(PoseStore::new());
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                store.replace(Pose::new(7.0, 0.0, 0.0, 0.0, 0.0));
            })
        };

        let pose = store
            .wait_for_pose(Duration::from_secs(2), Duration::from_millis(5))
            .unwrap();
        assert_eq!(pose.x, 7.0);
        writer.join().unwrap();
    }

    #[test]
    fn test_concurrent_read_write() {
        let store = Arc::new(PoseStore::new());

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    store.replace(Pose::new(i as f64, i as f64, i as f64, 0.0, 0.0));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        // 读到的位姿必须是某一次完整写入，不会撕裂
                        if let Some(pose) = store.read() {
                            assert_eq!(pose.x, pose.y);
                            assert_eq!(pose.y, pose.z);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.read().unwrap().x, 199.0);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PoseStore>();
    }
}
