//! 脚本系统
//!
//! JSON 脚本按顺序执行动作请求和等待：
//!
//! ```json
//! {
//!   "name": "square",
//!   "description": "walk a 2x2 square",
//!   "commands": [
//!     {"action": "move", "x": 2.0, "z": 0.0},
//!     {"wait_ms": 200},
//!     {"action": "relative_look", "pitch": 0.0, "yaw": 90.0}
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use voxbot_sdk::ActionRequest;

use crate::session::Session;

/// 脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 命令序列
    pub commands: Vec<ScriptStep>,
}

/// 脚本步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// 动作请求
    Action(ActionRequest),

    /// 等待
    Wait { wait_ms: u64 },
}

/// 脚本执行结果
#[derive(Debug, Default)]
pub struct ScriptResult {
    pub total_commands: usize,
    pub succeeded: Vec<usize>,
    pub failed: Vec<(usize, String)>,
    pub interrupted: bool,
    pub duration_secs: f64,
}

impl Script {
    /// 加载脚本文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path).context("读取脚本文件失败")?;
        Self::parse(&content)
    }

    /// 解析脚本 JSON
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("解析脚本 JSON 失败")
    }
}

/// 脚本执行器
pub struct ScriptExecutor<'a> {
    session: &'a Session,
    continue_on_error: bool,
}

impl<'a> ScriptExecutor<'a> {
    pub fn new(session: &'a Session, continue_on_error: bool) -> Self {
        ScriptExecutor {
            session,
            continue_on_error,
        }
    }

    /// 执行脚本
    pub fn execute(&self, script: &Script) -> Result<ScriptResult> {
        let start = Instant::now();
        let mut result = ScriptResult {
            total_commands: script.commands.len(),
            ..Default::default()
        };

        for (i, step) in script.commands.iter().enumerate() {
            if self.session.is_interrupted() {
                println!("🛑 收到中断信号，停止执行");
                result.interrupted = true;
                break;
            }

            println!("命令 {}/{}:", i + 1, result.total_commands);
            match step {
                ScriptStep::Wait { wait_ms } => {
                    println!("  ⏸️  等待 {wait_ms}ms");
                    std::thread::sleep(Duration::from_millis(*wait_ms));
                    result.succeeded.push(i);
                },
                ScriptStep::Action(request) => match self.session.run_action(*request) {
                    Ok(true) => result.succeeded.push(i),
                    Ok(false) => {
                        result.failed.push((i, format!("{} returned false", request.name())));
                        if !self.continue_on_error {
                            println!("❌ 脚本执行失败，停止执行");
                            break;
                        }
                    },
                    Err(err) => {
                        result.failed.push((i, err.to_string()));
                        if !self.continue_on_error {
                            println!("❌ 脚本执行失败，停止执行");
                            break;
                        }
                    },
                },
            }
        }

        result.duration_secs = start.elapsed().as_secs_f64();
        Ok(result)
    }
}
