//! 模拟化身演示
//!
//! 转向、沿正方形行走一圈（第二条边带跳跃），最后挖掘脚下的方块。
//!
//! ```bash
//! RUST_LOG=debug cargo run --example simulated_walk
//! ```

use std::time::Duration;
use voxbot_sdk::prelude::*;

fn main() -> Result<(), ClientError> {
    voxbot_sdk::init_logger();

    let mut config = VoxbotConfig::default();
    config.simulator.max_turn_per_command_deg = Some(45.0);
    config.controller.dig_duration = Duration::from_secs(1);

    let bot = VoxbotBuilder::new()
        .config(config)
        .ready_timeout(Duration::from_secs(5))
        .build_simulated()?;

    let start = bot.pose().ok_or(ClientError::PoseUnavailable)?;
    println!("start: {start:?}");

    let corners = [(4.0, 0.0, false), (4.0, 4.0, true), (0.0, 4.0, false), (0.0, 0.0, false)];
    for (x, z, jump) in corners {
        let ok = bot.service().set_move(start.x + x, start.z + z, jump);
        println!("move to ({x}, {z}) jump={jump}: {ok}");
    }

    let looked = bot.service().set_relative_look(30.0, 135.0);
    println!("relative look: {looked}");

    let pose = bot.pose().ok_or(ClientError::PoseUnavailable)?;
    let dug = bot.service().set_dig(
        pose.x.floor() as i32,
        pose.y.floor() as i32 - 1,
        pose.z.floor() as i32,
    );
    println!("dig: {dug}");

    let metrics = bot.metrics().snapshot();
    println!(
        "motion={} camera={} dig={} errors={}",
        metrics.motion_commands, metrics.camera_snapshots, metrics.dig_commands, metrics.sink_errors
    );

    bot.shutdown();
    Ok(())
}
