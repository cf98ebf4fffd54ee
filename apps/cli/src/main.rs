//! # Voxbot CLI
//!
//! 驱动模拟化身的命令行工具。每次调用都会：加载配置 → 启动模拟化身 →
//! 执行动作 → 打印最终位姿。
//!
//! ```bash
//! # 写入默认配置
//! voxbot-cli config init
//!
//! # 单个动作
//! voxbot-cli look 0 90
//! voxbot-cli move 4 -2 --jump
//! voxbot-cli rel-move -90 3
//! voxbot-cli dig 1 63 0
//!
//! # 执行脚本，并输出所有出站消息
//! voxbot-cli --dump run square.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod script;
mod session;

use commands::{ActionCommand, ConfigCommand, RunCommand};
use session::SessionOptions;

/// Voxbot CLI - 化身控制命令行工具
#[derive(Parser, Debug)]
#[command(name = "voxbot-cli")]
#[command(
    about = "Command-line interface for driving a simulated voxbot avatar",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<String>,

    /// 结束时以 JSON 行输出出站消息（不含相机快照）
    #[arg(long, global = true)]
    dump: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Action(ActionCommand),

    /// 执行脚本
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<ExitCode> {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive("voxbot_cli=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let options = SessionOptions {
        config_path: cli.config.clone(),
        dump: cli.dump,
    };

    let success = match cli.command {
        Commands::Action(cmd) => cmd.execute(&options)?,
        Commands::Run { args } => args.execute(&options)?,
        Commands::Config(cmd) => {
            cmd.execute(cli.config.as_deref())?;
            true
        },
    };

    if success {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!("action reported failure");
        Ok(ExitCode::FAILURE)
    }
}
