//! 模拟会话
//!
//! 每次 CLI 调用：加载配置 → 启动模拟化身 → 等待第一个位姿 → 执行 → 汇总。

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use voxbot_sdk::prelude::*;

use crate::commands::config::resolve_config_path;

/// 会话选项
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// 配置文件（覆盖默认路径）
    pub config_path: Option<String>,
    /// 结束时以 JSON 行输出出站消息
    pub dump: bool,
}

/// 模拟会话
pub struct Session {
    bot: Voxbot,
    interrupted: Arc<AtomicBool>,
    dump: bool,
}

impl Session {
    /// 启动会话并等待化身就绪
    pub fn start(options: &SessionOptions) -> Result<Self> {
        let path = resolve_config_path(options.config_path.as_deref())?;
        let config = load_config(&path)?;
        let ready_timeout = config.controller.first_pose_poll * 5;

        let bot = VoxbotBuilder::new()
            .config(config)
            .ready_timeout(ready_timeout.max(Duration::from_secs(1)))
            .build_simulated()
            .context("启动模拟化身失败")?;

        let interrupted = Arc::new(AtomicBool::new(false));
        let camera_flag = bot.camera_shutdown_flag();
        let flag = interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            camera_flag.store(true, Ordering::SeqCst);
        })
        .context("注册 Ctrl-C 处理器失败")?;

        if let Some(pose) = bot.pose() {
            println!(
                "🟢 化身就绪: ({:.2}, {:.2}, {:.2}) pitch={:.1} yaw={:.1}",
                pose.x, pose.y, pose.z, pose.pitch, pose.yaw
            );
        }

        Ok(Session {
            bot,
            interrupted,
            dump: options.dump,
        })
    }

    pub fn service(&self) -> &ActionService {
        self.bot.service()
    }

    /// 是否收到 Ctrl-C
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// 执行单个动作并打印结果
    pub fn run_action(&self, request: ActionRequest) -> Result<bool> {
        println!("▶️  {}", describe(&request));
        let outcome = self.service().execute(request)?;
        print_outcome(&outcome);
        Ok(outcome.is_success())
    }

    /// 打印最终位姿和统计，然后停止后台线程
    pub fn finish(self) -> Result<()> {
        if let Some(pose) = self.bot.pose() {
            println!(
                "📍 最终位姿: ({:.2}, {:.2}, {:.2}) pitch={:.1} yaw={:.1}",
                pose.x, pose.y, pose.z, pose.pitch, pose.yaw
            );
        }

        let metrics = self.bot.metrics().snapshot();
        println!(
            "📊 运动命令: {}  相机快照: {}  挖掘命令: {}  发送失败: {}",
            metrics.motion_commands,
            metrics.camera_snapshots,
            metrics.dig_commands,
            metrics.sink_errors
        );

        if self.dump {
            if let Some(avatar) = self.bot.avatar() {
                for message in avatar.received() {
                    println!("{}", message.to_json_line()?);
                }
            }
        }

        self.bot.shutdown();
        Ok(())
    }
}

fn load_config(path: &Path) -> Result<VoxbotConfig> {
    VoxbotConfig::load_or_default(path)
        .with_context(|| format!("加载配置失败: {}", path.display()))
}

/// 请求的可读描述
pub fn describe(request: &ActionRequest) -> String {
    match *request {
        ActionRequest::Look { pitch, yaw } => format!("look pitch={pitch} yaw={yaw}"),
        ActionRequest::RelativeLook { pitch, yaw } => {
            format!("relative look Δpitch={pitch} Δyaw={yaw}")
        },
        ActionRequest::Move { x, z, jump } => format!("move to ({x}, {z}) jump={jump}"),
        ActionRequest::RelativeMove {
            direction,
            distance,
            jump,
        } => format!("move {distance} toward {direction}° jump={jump}"),
        ActionRequest::Dig { x, y, z } => format!("dig ({x}, {y}, {z})"),
    }
}

fn print_outcome(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Converged { ticks } => println!("  ✅ 已收敛（{ticks} 个周期）"),
        ActionOutcome::Completed { frames } => println!("  ✅ 已完成（{frames} 条命令）"),
        ActionOutcome::TimedOut { ticks } => println!("  ⏱️  超时（{ticks} 个周期）"),
        ActionOutcome::InvalidInput(reason) => println!("  ❌ 输入非法: {reason}"),
    }
}
