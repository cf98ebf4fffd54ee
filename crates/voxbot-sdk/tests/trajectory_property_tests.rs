//! 轨迹合成与方位计算的属性测试

use proptest::prelude::*;
use voxbot_sdk::client::{MovementTrajectory, get_desired_yaw, get_movement_frames};
use voxbot_sdk::protocol::{JUMP_PEAK_OFFSET, Pose, SpeedLevel};

fn speed_strategy() -> impl Strategy<Value = SpeedLevel> {
    prop_oneof![Just(SpeedLevel::Walk), Just(SpeedLevel::Sprint)]
}

/// 沿偏航角前进 `dist` 后的平面位置
fn walk(x: f64, z: f64, yaw: f64, dist: f64) -> (f64, f64) {
    let (sin, cos) = yaw.to_radians().sin_cos();
    (x - dist * sin, z + dist * cos)
}

proptest! {
    #[test]
    fn prop_desired_yaw_points_toward_target(
        x0 in -1000.0f64..1000.0,
        z0 in -1000.0f64..1000.0,
        x1 in -1000.0f64..1000.0,
        z1 in -1000.0f64..1000.0,
        fraction in 0.01f64..0.99,
    ) {
        let separation = (x1 - x0).hypot(z1 - z0);
        prop_assume!(separation > 1e-3);

        let yaw = get_desired_yaw(x0, z0, x1, z1).unwrap();
        prop_assert!(yaw > -180.0 && yaw <= 180.0);

        let (x, z) = walk(x0, z0, yaw, fraction * separation);
        let remaining = (x1 - x).hypot(z1 - z);
        prop_assert!(
            remaining < separation,
            "walking {} along {} left {} of {}",
            fraction * separation, yaw, remaining, separation
        );
    }

    #[test]
    fn prop_frame_count_and_endpoint(
        x in -100.0f64..100.0,
        z in -100.0f64..100.0,
        direction in -180.0f64..180.0,
        distance in 0.0f64..50.0,
        speed in speed_strategy(),
    ) {
        let start = Pose::new(x, 64.0, z, 0.0, 0.0);
        let frames = get_movement_frames(&start, direction, distance, speed, false);
        let step = speed.step_distance();

        let expected = (distance / step).ceil() as i64;
        prop_assert!((frames.len() as i64 - expected).abs() <= 1);

        if let Some(last) = frames.last() {
            let (tx, tz) = walk(x, z, direction, distance);
            let miss = (last.x - tx).hypot(last.z - tz);
            prop_assert!(miss <= step + 1e-9, "endpoint missed by {}", miss);
        } else {
            prop_assert_eq!(distance, 0.0);
        }
    }

    #[test]
    fn prop_jump_rises_then_falls(
        y in -64.0f64..320.0,
        direction in -180.0f64..180.0,
        speed in speed_strategy(),
    ) {
        let start = Pose::new(0.0, y, 0.0, 0.0, 0.0);
        let frames = get_movement_frames(&start, direction, 10.0, speed, true);

        let landing = frames.iter().position(|f| f.on_ground).unwrap();
        let arc = &frames[..=landing];
        let heights: Vec<f64> = arc.iter().map(|f| f.y).collect();

        let peak_index = heights
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        prop_assert!((heights[peak_index] - (y + JUMP_PEAK_OFFSET)).abs() < 1e-9);

        for pair in heights[..=peak_index].windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
        for pair in heights[peak_index..].windows(2) {
            prop_assert!(pair[1] < pair[0]);
        }
        prop_assert_eq!(*heights.last().unwrap(), y);

        // 只有最后一帧着地
        prop_assert!(arc[..landing].iter().all(|f| !f.on_ground));
    }

    #[test]
    fn prop_trajectory_is_deterministic(
        direction in -180.0f64..180.0,
        distance in 0.0f64..20.0,
        jump in any::<bool>(),
    ) {
        let start = Pose::new(1.0, 70.0, -1.0, 5.0, 5.0);
        let a = get_movement_frames(&start, direction, distance, SpeedLevel::Walk, jump);
        let b: Vec<_> =
            MovementTrajectory::new(start, direction, distance, SpeedLevel::Walk, jump).collect();
        prop_assert_eq!(a, b);
    }
}
