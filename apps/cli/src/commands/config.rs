//! 配置管理命令
//!
//! 默认配置文件位于 `<config_dir>/voxbot/config.toml`。

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use voxbot_sdk::VoxbotConfig;

/// 默认配置文件路径
fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("voxbot");
    path.push("config.toml");
    Ok(path)
}

/// 解析配置文件路径（命令行参数优先）
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_config_file(),
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置（TOML）
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 打印配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, config_path: Option<&str>) -> Result<()> {
        let path = resolve_config_path(config_path)?;

        match self {
            ConfigCommand::Show => Self::show_(&path),
            ConfigCommand::Init { force } => Self::init_(&path, force),
            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }

    fn show_(path: &Path) -> Result<()> {
        let config = VoxbotConfig::load_or_default(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?;

        if path.exists() {
            println!("# {}", path.display());
        } else {
            println!("# {}（不存在，使用默认值）", path.display());
        }
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn init_(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        VoxbotConfig::default()
            .save(path)
            .with_context(|| format!("写入配置失败: {}", path.display()))?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some("/tmp/voxbot.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/voxbot.toml"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        ConfigCommand::Init { force: false }
            .execute(Some(path_str))
            .unwrap();
        assert_eq!(
            VoxbotConfig::load(&path).unwrap(),
            VoxbotConfig::default()
        );

        assert!(
            ConfigCommand::Init { force: false }
                .execute(Some(path_str))
                .is_err()
        );
        ConfigCommand::Init { force: true }
            .execute(Some(path_str))
            .unwrap();
        ConfigCommand::Show.execute(Some(path_str)).unwrap();
    }
}
