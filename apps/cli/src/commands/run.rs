//! run 命令
//!
//! 执行脚本文件

use anyhow::Result;
use clap::Args;

use crate::script::{Script, ScriptExecutor};
use crate::session::{Session, SessionOptions};

/// 脚本执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 脚本文件路径
    pub script: String,

    /// 失败时继续执行
    #[arg(long)]
    pub continue_on_error: bool,
}

impl RunCommand {
    /// 执行脚本，返回是否全部成功
    pub fn execute(&self, options: &SessionOptions) -> Result<bool> {
        println!("📜 加载脚本: {}", self.script);
        let script = Script::load(&self.script)?;

        println!("📋 脚本: {}", script.name);
        if !script.description.is_empty() {
            println!("    {}", script.description);
        }
        println!("    {} 个命令", script.commands.len());
        println!();

        let session = Session::start(options)?;
        let result = ScriptExecutor::new(&session, self.continue_on_error).execute(&script)?;

        println!();
        println!("📊 执行结果:");
        println!("  总命令数: {}", result.total_commands);
        println!("  成功: {}", result.succeeded.len());
        println!("  失败: {}", result.failed.len());
        println!("  耗时: {:.2} 秒", result.duration_secs);

        if !result.failed.is_empty() {
            println!();
            println!("❌ 失败的命令:");
            for (idx, err) in &result.failed {
                println!("  命令 {}: {}", idx + 1, err);
            }
        }

        session.finish()?;
        Ok(result.failed.is_empty() && !result.interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_creation() {
        let cmd = RunCommand {
            script: "test.json".to_string(),
            continue_on_error: true,
        };

        assert_eq!(cmd.script, "test.json");
        assert!(cmd.continue_on_error);
    }
}
