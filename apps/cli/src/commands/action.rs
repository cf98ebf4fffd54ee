//! 单动作命令
//!
//! 每个子命令对应动作服务的一个操作。

use anyhow::Result;
use clap::Subcommand;
use voxbot_sdk::ActionRequest;

use crate::session::{Session, SessionOptions};

/// 单动作命令
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ActionCommand {
    /// 转向绝对朝向
    Look {
        /// 俯仰角（度，-90 仰视，90 俯视）
        #[arg(allow_negative_numbers = true)]
        pitch: f64,
        /// 偏航角（度）
        #[arg(allow_negative_numbers = true)]
        yaw: f64,
    },

    /// 相对当前朝向转动（俯仰取减号）
    RelLook {
        #[arg(allow_negative_numbers = true)]
        pitch: f64,
        #[arg(allow_negative_numbers = true)]
        yaw: f64,
    },

    /// 走向目标点
    Move {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        /// 起步时跳跃
        #[arg(short, long)]
        jump: bool,
    },

    /// 沿指定方向移动
    RelMove {
        /// 方向（偏航角，度）
        #[arg(allow_negative_numbers = true)]
        direction: f64,
        /// 距离（方块）
        distance: f64,
        #[arg(short, long)]
        jump: bool,
    },

    /// 挖掘方块
    Dig {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
}

impl ActionCommand {
    /// 转换为动作请求
    pub fn to_request(self) -> ActionRequest {
        match self {
            ActionCommand::Look { pitch, yaw } => ActionRequest::Look { pitch, yaw },
            ActionCommand::RelLook { pitch, yaw } => ActionRequest::RelativeLook { pitch, yaw },
            ActionCommand::Move { x, z, jump } => ActionRequest::Move { x, z, jump },
            ActionCommand::RelMove {
                direction,
                distance,
                jump,
            } => ActionRequest::RelativeMove {
                direction,
                distance,
                jump,
            },
            ActionCommand::Dig { x, y, z } => ActionRequest::Dig { x, y, z },
        }
    }

    /// 启动会话执行一次
    pub fn execute(self, options: &SessionOptions) -> Result<bool> {
        let session = Session::start(options)?;
        let success = session.run_action(self.to_request())?;
        session.finish()?;
        Ok(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request() {
        let cmd = ActionCommand::RelMove {
            direction: -90.0,
            distance: 2.5,
            jump: true,
        };
        assert_eq!(
            cmd.to_request(),
            ActionRequest::RelativeMove {
                direction: -90.0,
                distance: 2.5,
                jump: true
            }
        );
        assert_eq!(
            ActionCommand::Dig { x: 1, y: -2, z: 3 }.to_request(),
            ActionRequest::Dig { x: 1, y: -2, z: 3 }
        );
    }
}
