//! 状态观察器
//!
//! 消费传输层送来的 `PoseUpdate`，整体覆盖 `PoseStore`。
//!
//! - 不做校验，不做排序：晚到的旧观测会覆盖较新的观测（last-write-wins）
//! - `PoseUpdate` 不含着地标志，沿用上一次的值（初始为 `true`）
//! - 可以同步调用 `apply()`，也可以 `spawn()` 到后台线程消费通道

use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, trace};
use voxbot_protocol::PoseUpdate;

use crate::{DriverError, DriverMetrics, PoseStore};

/// 后台线程检查关闭标志的间隔
const SHUTDOWN_POLL: Duration = Duration::from_millis(20);

/// 状态观察器
#[derive(Clone)]
pub struct StateObserver {
    store: Arc<PoseStore>,
    metrics: Arc<DriverMetrics>,
}

impl StateObserver {
    pub fn new(store: Arc<PoseStore>, metrics: Arc<DriverMetrics>) -> Self {
        StateObserver { store, metrics }
    }

    /// 共享的位姿存储
    pub fn store(&self) -> &Arc<PoseStore> {
        &self.store
    }

    /// 处理一次观测
    pub fn apply(&self, update: &PoseUpdate) {
        let on_ground = self.store.read().map(|pose| pose.on_ground).unwrap_or(true);
        let first = !self.store.is_ready();

        self.store.replace(update.apply_to(on_ground));
        self.metrics.poses_observed.fetch_add(1, Ordering::Relaxed);

        if first {
            info!(
                x = update.x,
                y = update.y,
                z = update.z,
                "First pose observation received"
            );
        } else {
            trace!(x = update.x, z = update.z, yaw = update.yaw, "Pose updated");
        }
    }

    /// 在后台线程中消费观测通道
    ///
    /// 线程在通道断开或调用 `ObserverHandle::shutdown()` 后退出。
    pub fn spawn(self, rx: Receiver<PoseUpdate>) -> Result<ObserverHandle, DriverError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("voxbot-observer".to_string())
            .spawn(move || self.observer_loop(rx, shutdown_clone))
            .map_err(|e| DriverError::IoThread(e.to_string()))?;

        Ok(ObserverHandle {
            handle: Some(handle),
            shutdown,
        })
    }

    fn observer_loop(&self, rx: Receiver<PoseUpdate>, shutdown: Arc<AtomicBool>) {
        while !shutdown.load(Ordering::Relaxed) {
            match rx.recv_timeout(SHUTDOWN_POLL) {
                Ok(update) => self.apply(&update),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Pose channel disconnected, observer exiting");
                    break;
                },
            }
        }
    }
}

/// 后台观察线程句柄
///
/// Drop 时自动关闭并 join。
pub struct ObserverHandle {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl ObserverHandle {
    /// 关闭观察线程并等待退出
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// 线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
