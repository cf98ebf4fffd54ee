//! 相机发布器
//!
//! 后台线程按固定周期发布当前位姿的 `CameraSnapshot`，直到收到关闭信号。
//!
//! # 工作原理
//!
//! - 第一个位姿到达之前只轮询，不发布任何快照
//! - 之后每个周期无条件发布一次（位姿未变化也发布）
//! - 发送失败只记录警告，循环继续
//!
//! 关闭信号是一个共享的 `AtomicBool`，可以交给外部（如 Ctrl-C 处理器）置位。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use voxbot_protocol::CameraSnapshot;

use crate::{CommandPublisher, DriverError, PoseStore};

/// 相机发布配置
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// 发布周期
    pub interval: Duration,
    /// 是否启用（默认启用）
    pub enabled: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            interval: Duration::from_millis(100), // 10Hz
            enabled: true,
        }
    }
}

/// 相机发布器
pub struct CameraPublisher {
    handle: Option<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl CameraPublisher {
    /// 启动发布线程
    pub fn start(
        store: Arc<PoseStore>,
        publisher: CommandPublisher,
        config: CameraConfig,
    ) -> Result<Self, DriverError> {
        Self::start_with_shutdown(store, publisher, config, Arc::new(AtomicBool::new(false)))
    }

    /// 使用外部关闭标志启动发布线程
    pub fn start_with_shutdown(
        store: Arc<PoseStore>,
        publisher: CommandPublisher,
        config: CameraConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, DriverError> {
        if !config.enabled {
            shutdown.store(true, Ordering::Relaxed);
            return Ok(CameraPublisher {
                handle: None,
                shutdown,
            });
        }

        let shutdown_clone = shutdown.clone();
        let handle = thread::Builder::new()
            .name("voxbot-camera".to_string())
            .spawn(move || Self::camera_loop(store, publisher, config, shutdown_clone))
            .map_err(|e| DriverError::IoThread(e.to_string()))?;

        Ok(CameraPublisher {
            handle: Some(handle),
            shutdown,
        })
    }

    /// 发布循环
    fn camera_loop(
        store: Arc<PoseStore>,
        publisher: CommandPublisher,
        config: CameraConfig,
        shutdown: Arc<AtomicBool>,
    ) {
        let mut waiting_logged = false;

        while !shutdown.load(Ordering::Relaxed) {
            match store.read() {
                Some(pose) => {
                    // 失败已在 CommandPublisher 中记录和计数
                    let _ = publisher.publish_camera(CameraSnapshot::from(&pose));
                },
                None => {
                    if !waiting_logged {
                        debug!("Camera publisher waiting for the first pose");
                        waiting_logged = true;
                    }
                },
            }

            spin_sleep::sleep(config.interval);
        }

        debug!("Camera publisher stopped");
    }

    /// 共享的关闭标志
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// 优雅关闭发布线程
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// 检查发布线程是否在运行
    pub fn is_running(&self) -> bool {
        !self.shutdown.load(Ordering::Relaxed)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Camera publisher thread panicked");
            }
        }
    }
}

impl Drop for CameraPublisher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DriverMetrics, RecordingSink};
    use voxbot_protocol::Pose;

    fn fast_config() -> CameraConfig {
        CameraConfig {
            interval: Duration::from_millis(10),
            enabled: true,
        }
    }

    fn create_publisher() -> (Arc<RecordingSink>, CommandPublisher) {
        let sink = Arc::new(RecordingSink::new());
        let publisher = CommandPublisher::new(sink.clone(), Arc::new(DriverMetrics::new()));
        (sink, publisher)
    }

    #[test]
    fn test_camera_publishes_snapshots() {
        let (sink, publisher) = create_publisher();
        let store = Arc::new(PoseStore::with_pose(Pose::new(1.0, 2.0, 3.0, 4.0, 5.0)));

        let camera = CameraPublisher::start(store, publisher, fast_config()).unwrap();
        assert!(camera.is_running());
        thread::sleep(Duration::from_millis(100));
        camera.shutdown();

        let snapshots = sink.cameras();
        assert!(
            snapshots.len() >= 3,
            "Expected at least 3 snapshots, got {}",
            snapshots.len()
        );
        assert!(snapshots.iter().all(|s| s.yaw == 5.0 && s.x == 1.0));
    }

    #[test]
    fn test_camera_silent_before_first_pose() {
        let (sink, publisher) = create_publisher();
        let store = Arc::new(PoseStore::new());

        let camera = CameraPublisher::start(store.clone(), publisher, fast_config()).unwrap();
        thread::sleep(Duration::from_millis(60));
        assert!(sink.is_empty());

        store.replace(Pose::default());
        thread::sleep(Duration::from_millis(60));
        camera.shutdown();
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_camera_external_shutdown() {
        let (_sink, publisher) = create_publisher();
        let store = Arc::new(PoseStore::with_pose(Pose::default()));
        let flag = Arc::new(AtomicBool::new(false));

        let camera =
            CameraPublisher::start_with_shutdown(store, publisher, fast_config(), flag.clone())
                .unwrap();
        flag.store(true, Ordering::Relaxed);
        assert!(!camera.is_running());

        let start = std::time::Instant::now();
        drop(camera);
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_camera_disabled() {
        let (sink, publisher) = create_publisher();
        let store = Arc::new(PoseStore::with_pose(Pose::default()));
        let config = CameraConfig {
            enabled: false,
            ..fast_config()
        };

        let camera = CameraPublisher::start(store, publisher, config).unwrap();
        assert!(!camera.is_running());
        thread::sleep(Duration::from_millis(30));
        assert!(sink.is_empty());
    }
}
