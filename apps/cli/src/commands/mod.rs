//! 命令定义和实现

pub mod action;
pub mod config;
pub mod run;

pub use action::ActionCommand;
pub use config::ConfigCommand;
pub use run::RunCommand;
