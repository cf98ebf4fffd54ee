//! Voxbot Builder
//!
//! 把观察器、相机发布器、控制器和动作服务组装为一个运行实例。
//!
//! # 示例
//!
//! ```rust,no_run
//! use voxbot_client::{VoxbotBuilder, VoxbotConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), voxbot_client::ClientError> {
//! let bot = VoxbotBuilder::new()
//!     .config(VoxbotConfig::default())
//!     .ready_timeout(Duration::from_secs(5))
//!     .build_simulated()?;
//!
//! assert!(bot.service().set_relative_move(0.0, 2.0, false));
//! bot.shutdown();
//! # Ok(())
//! # }
//! ```

use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::info;
use voxbot_driver::{
    CameraConfig, CameraPublisher, CommandPublisher, CommandSink, DriverMetrics, ObserverHandle,
    PoseStore, SimulatedAvatar, SimulatorConfig, StateObserver,
};
use voxbot_protocol::{Pose, PoseUpdate};

use crate::clock::{Clock, SystemClock};
use crate::config::VoxbotConfig;
use crate::control::MotionController;
use crate::error::ClientError;
use crate::service::ActionService;

/// 观测通道容量
const POSE_CHANNEL_CAPACITY: usize = 256;

/// Voxbot Builder
pub struct VoxbotBuilder {
    config: VoxbotConfig,
    clock: Option<Arc<dyn Clock>>,
    ready_timeout: Option<Duration>,
}

impl VoxbotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置完整配置
    pub fn config(mut self, config: VoxbotConfig) -> Self {
        self.config = config;
        self
    }

    /// 替换时钟（测试中使用 `ManualClock`）
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 构建后等待第一个位姿（默认不等待）
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = Some(timeout);
        self
    }

    /// 连接外部传输层
    ///
    /// `sink` 接收出站消息，`pose_rx` 送入观测。
    pub fn build(
        self,
        sink: Arc<dyn CommandSink>,
        pose_rx: Receiver<PoseUpdate>,
    ) -> Result<Voxbot, ClientError> {
        self.assemble(sink, pose_rx, None)
    }

    /// 连接模拟化身
    pub fn build_simulated(self) -> Result<Voxbot, ClientError> {
        let (pose_tx, pose_rx) = crossbeam_channel::bounded(POSE_CHANNEL_CAPACITY);
        let avatar = Arc::new(SimulatedAvatar::new(
            SimulatorConfig::from(&self.config.simulator),
            pose_tx,
        ));

        self.assemble(avatar.clone(), pose_rx, Some(avatar))
    }

    fn assemble(
        self,
        sink: Arc<dyn CommandSink>,
        pose_rx: Receiver<PoseUpdate>,
        avatar: Option<Arc<SimulatedAvatar>>,
    ) -> Result<Voxbot, ClientError> {
        self.config.validate()?;

        let store = Arc::new(PoseStore::new());
        let metrics = Arc::new(DriverMetrics::new());
        let publisher = CommandPublisher::new(sink, metrics.clone());

        let observer = StateObserver::new(store.clone(), metrics.clone()).spawn(pose_rx)?;
        let camera = CameraPublisher::start(
            store.clone(),
            publisher.clone(),
            CameraConfig::from(&self.config.camera),
        )?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let controller =
            MotionController::new(store.clone(), publisher, clock, self.config.controller.clone());
        let service = ActionService::new(controller);

        if let Some(avatar) = &avatar {
            avatar.announce()?;
        }

        let bot = Voxbot {
            service,
            store,
            metrics,
            avatar,
            camera: Some(camera),
            observer: Some(observer),
        };

        if let Some(timeout) = self.ready_timeout {
            let pose = bot.service.wait_until_ready(timeout)?;
            info!(x = pose.x, y = pose.y, z = pose.z, "Voxbot ready");
        }

        Ok(bot)
    }
}

impl Default for VoxbotBuilder {
    fn default() -> Self {
        VoxbotBuilder {
            config: VoxbotConfig::default(),
            clock: None,
            ready_timeout: None,
        }
    }
}

/// 运行实例
///
/// Drop 时停止相机发布器和观察线程。
pub struct Voxbot {
    service: ActionService,
    store: Arc<PoseStore>,
    metrics: Arc<DriverMetrics>,
    avatar: Option<Arc<SimulatedAvatar>>,
    camera: Option<CameraPublisher>,
    observer: Option<ObserverHandle>,
}

impl Voxbot {
    /// 动作服务
    pub fn service(&self) -> &ActionService {
        &self.service
    }

    /// 当前位姿
    pub fn pose(&self) -> Option<Pose> {
        self.store.read()
    }

    /// 共享的位姿存储
    pub fn store(&self) -> &Arc<PoseStore> {
        &self.store
    }

    /// 驱动层指标
    pub fn metrics(&self) -> &Arc<DriverMetrics> {
        &self.metrics
    }

    /// 模拟化身（仅 `build_simulated` 构建的实例）
    pub fn avatar(&self) -> Option<&Arc<SimulatedAvatar>> {
        self.avatar.as_ref()
    }

    /// 相机发布器的关闭标志，可交给信号处理器
    pub fn camera_shutdown_flag(&self) -> Arc<AtomicBool> {
        self.camera
            .as_ref()
            .map(CameraPublisher::shutdown_flag)
            .unwrap_or_else(|| Arc::new(AtomicBool::new(true)))
    }

    /// 相机发布器是否仍在运行
    pub fn is_camera_running(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraPublisher::is_running)
    }

    /// 停止后台线程
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(camera) = self.camera.take() {
            camera.shutdown();
        }
        if let Some(observer) = self.observer.take() {
            observer.shutdown();
        }
    }
}

impl Drop for Voxbot {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use voxbot_driver::RecordingSink;

    #[test]
    fn test_build_simulated_ready() {
        let bot = VoxbotBuilder::new()
            .clock(Arc::new(ManualClock::new()))
            .ready_timeout(Duration::from_secs(2))
            .build_simulated()
            .unwrap();

        assert_eq!(bot.pose().unwrap().y, 64.0);
        assert!(bot.avatar().is_some());
        assert!(bot.is_camera_running());
        bot.shutdown();
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = VoxbotConfig::default();
        config.controller.tolerance_ratio = 2.0;

        let result = VoxbotBuilder::new().config(config).build_simulated();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_build_with_external_transport() {
        let sink = Arc::new(RecordingSink::new());
        let (tx, rx) = crossbeam_channel::unbounded();
        let bot = VoxbotBuilder::new()
            .clock(Arc::new(ManualClock::new()))
            .build(sink.clone(), rx)
            .unwrap();
        assert!(bot.avatar().is_none());
        assert!(!bot.service().is_ready());

        tx.send(PoseUpdate {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            pitch: 0.0,
            yaw: 0.0,
        })
        .unwrap();
        let pose = bot.service().wait_until_ready(Duration::from_secs(2)).unwrap();
        assert_eq!(pose.z, 3.0);

        assert!(bot.service().set_dig(1, 2, 3));
        assert_eq!(sink.digs().len(), 1);
    }

    #[test]
    fn test_ready_timeout_without_pose() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let mut config = VoxbotConfig::default();
        config.controller.first_pose_poll = Duration::from_millis(5);

        let result = VoxbotBuilder::new()
            .config(config)
            .ready_timeout(Duration::from_millis(20))
            .build(Arc::new(RecordingSink::new()), rx);
        assert!(matches!(result, Err(ClientError::NotReady { .. })));
    }
}
