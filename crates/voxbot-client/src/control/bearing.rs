//! 目标方位计算

use voxbot_protocol::normalize_yaw;

/// 从 `(x0, z0)` 看向 `(x1, z1)` 所需的偏航角（度）
///
/// 结果采用游戏偏航约定并归一化到 `(-180, 180]`。目标与当前位置重合、
/// 任一输入非有限或两点距离溢出时返回 `None`；调用方需要自行区分重合
/// 与溢出（见 `Pose::planar_distance_to`）。
///
/// ```rust
/// use voxbot_client::control::get_desired_yaw;
///
/// assert_eq!(get_desired_yaw(0.0, 0.0, 0.0, 5.0), Some(0.0));
/// let east = get_desired_yaw(0.0, 0.0, 5.0, 0.0).unwrap();
/// assert!((east + 90.0).abs() < 1e-9);
/// assert_eq!(get_desired_yaw(1.0, 1.0, 1.0, 1.0), None);
/// ```
pub fn get_desired_yaw(x0: f64, z0: f64, x1: f64, z1: f64) -> Option<f64> {
    let l = x1 - x0;
    let w = z1 - z0;
    let c = l.hypot(w);
    if !c.is_finite() || c == 0.0 {
        return None;
    }

    let alpha1 = -(l / c).clamp(-1.0, 1.0).asin().to_degrees();
    let alpha2 = (w / c).clamp(-1.0, 1.0).acos().to_degrees();
    let yaw = if alpha2 > 90.0 { 180.0 - alpha1 } else { alpha1 };

    Some(normalize_yaw(yaw))
}
