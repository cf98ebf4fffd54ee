//! 命令发送
//!
//! - `CommandSink`: 传输层出站接口（外部协作者实现）
//! - `ChannelSink`: 通过有界通道转发给传输线程
//! - `RecordingSink`: 内存录制（测试、CLI 汇总）
//! - `CommandPublisher`: 控制器/相机发布器使用的发送句柄（统计 + 日志）

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{trace, warn};
use voxbot_protocol::{CameraSnapshot, DigCommand, MotionCommand, Outbound};

use crate::{DriverError, DriverMetrics};

/// 传输层出站接口
///
/// 实现方需要线程安全：控制器线程和相机发布线程会并发调用。
pub trait CommandSink: Send + Sync {
    /// 发送一条出站消息
    fn publish(&self, message: Outbound) -> Result<(), DriverError>;
}

/// 通道转发
///
/// 队列满时立即失败（不阻塞控制循环）。
pub struct ChannelSink {
    tx: Sender<Outbound>,
    capacity: usize,
}

impl ChannelSink {
    /// 默认通道容量
    pub const DEFAULT_CAPACITY: usize = 100;

    /// 创建有界通道，返回发送端和接收端
    pub fn bounded(capacity: usize) -> (Self, crossbeam_channel::Receiver<Outbound>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (ChannelSink { tx, capacity }, rx)
    }
}

impl CommandSink for ChannelSink {
    fn publish(&self, message: Outbound) -> Result<(), DriverError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => DriverError::ChannelFull {
                capacity: self.capacity,
            },
            TrySendError::Disconnected(_) => DriverError::ChannelClosed,
        })
    }
}

/// 内存录制
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<Outbound>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已录制的全部消息（按发送顺序）
    pub fn messages(&self) -> Vec<Outbound> {
        self.messages.lock().clone()
    }

    /// 已录制的运动命令
    pub fn motions(&self) -> Vec<MotionCommand> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                Outbound::Motion(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// 已录制的相机快照
    pub fn cameras(&self) -> Vec<CameraSnapshot> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                Outbound::Camera(snap) => Some(*snap),
                _ => None,
            })
            .collect()
    }

    /// 已录制的挖掘命令
    pub fn digs(&self) -> Vec<DigCommand> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                Outbound::Dig(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl CommandSink for RecordingSink {
    fn publish(&self, message: Outbound) -> Result<(), DriverError> {
        self.messages.lock().push(message);
        Ok(())
    }
}

/// 发送句柄
///
/// 包装 `CommandSink`，按消息类别统计指标，失败时记录警告。
/// 克隆开销小（内部为 `Arc`）。
#[derive(Clone)]
pub struct CommandPublisher {
    sink: Arc<dyn CommandSink>,
    metrics: Arc<DriverMetrics>,
}

impl CommandPublisher {
    pub fn new(sink: Arc<dyn CommandSink>, metrics: Arc<DriverMetrics>) -> Self {
        CommandPublisher { sink, metrics }
    }

    /// 共享的指标实例
    pub fn metrics(&self) -> &Arc<DriverMetrics> {
        &self.metrics
    }

    /// 发送运动命令
    pub fn publish_motion(&self, cmd: MotionCommand) -> Result<(), DriverError> {
        self.publish(Outbound::Motion(cmd))
    }

    /// 发送相机快照
    pub fn publish_camera(&self, snapshot: CameraSnapshot) -> Result<(), DriverError> {
        self.publish(Outbound::Camera(snapshot))
    }

    /// 发送挖掘命令
    pub fn publish_dig(&self, cmd: DigCommand) -> Result<(), DriverError> {
        self.publish(Outbound::Dig(cmd))
    }

    fn publish(&self, message: Outbound) -> Result<(), DriverError> {
        let kind = message.kind();
        match self.sink.publish(message) {
            Ok(()) => {
                let counter = match message {
                    Outbound::Motion(_) => &self.metrics.motion_commands,
                    Outbound::Camera(_) => &self.metrics.camera_snapshots,
                    Outbound::Dig(_) => &self.metrics.dig_commands,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                trace!(kind, "Published outbound message");
                Ok(())
            },
            Err(e) => {
                self.metrics.sink_errors.fetch_add(1, Ordering::Relaxed);
                warn!(kind, error = %e, "Transport rejected outbound message");
                Err(e)
            },
        }
    }
}
