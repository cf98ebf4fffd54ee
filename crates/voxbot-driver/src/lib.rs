//! 驱动层模块
//!
//! 本模块负责控制器与外部传输层之间的状态同步和命令发送，包括：
//! - 位姿存储（ArcSwap 无锁读取，last-write-wins）
//! - 状态观察器（消费入站 `PoseUpdate`，覆盖位姿存储）
//! - 命令发送（`CommandSink` trait + 通道/录制实现 + 指标统计）
//! - 相机发布器（后台线程周期发布位姿快照）
//! - 模拟化身（回环传输，用于 CLI 和端到端测试）
//!
//! # 数据流
//!
//! ```text
//! PoseUpdate ──► StateObserver ──► PoseStore ──► { MotionController, CameraPublisher }
//!                                                        │
//!                                                        ▼
//!                                   CommandPublisher ──► CommandSink ──► 传输层
//! ```
//!
//! 大多数用户应该使用 `voxbot-client` 提供的 `ActionService`。

pub mod camera;
mod error;
pub mod metrics;
pub mod observer;
pub mod sim;
pub mod sink;
pub mod state;

pub use camera::{CameraConfig, CameraPublisher};
pub use error::DriverError;
pub use metrics::{DriverMetrics, MetricsSnapshot};
pub use observer::{ObserverHandle, StateObserver};
pub use sim::{SimulatedAvatar, SimulatorConfig};
pub use sink::{ChannelSink, CommandPublisher, CommandSink, RecordingSink};
pub use state::PoseStore;
