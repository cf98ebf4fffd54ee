//! 角度工具
//!
//! - `normalize_yaw`: 偏航角归一化到 `(-180, 180]`
//! - `clamp_pitch`: 俯仰角限幅到 `[-90, 90]`
//! - `ToleranceBand`: 收敛判定用的相对容差带
//!
//! 容差带不处理环绕：目标 180 与观测 -179.9 不视为收敛。

use crate::constants::{PITCH_MAX, PITCH_MIN};

/// 默认相对容差（目标值的 ±5%）
pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.05;

/// 将偏航角归一化到 `(-180, 180]`
///
/// 结果与反复 ±360 调整一致，但对任意大的输入都是常数时间。
/// 非有限值原样返回，由调用方校验。
///
/// ```rust
/// use voxbot_protocol::normalize_yaw;
///
/// assert_eq!(normalize_yaw(270.0), -90.0);
/// assert_eq!(normalize_yaw(-180.0), 180.0);
/// assert_eq!(normalize_yaw(540.0), 180.0);
/// ```
pub fn normalize_yaw(yaw: f64) -> f64 {
    if !yaw.is_finite() || (yaw > -180.0 && yaw <= 180.0) {
        return yaw;
    }
    let wrapped = (yaw + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}

/// 将俯仰角限幅到 `[-90, 90]`
pub fn clamp_pitch(pitch: f64) -> f64 {
    pitch.clamp(PITCH_MIN, PITCH_MAX)
}

/// 相对容差带
///
/// 观测值 `value` 满足 `target - |target|·ratio <= value <= target + |target|·ratio`
/// 时视为在带内。目标为 0 时带宽为 0，只有精确相等才算收敛。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    ratio: f64,
}

impl ToleranceBand {
    /// 创建容差带
    ///
    /// `ratio` 取绝对值；非有限值退化为默认比例。
    pub fn new(ratio: f64) -> Self {
        let ratio = if ratio.is_finite() {
            ratio.abs()
        } else {
            DEFAULT_TOLERANCE_RATIO
        };
        ToleranceBand { ratio }
    }

    /// 相对比例
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// 判断观测值是否落在目标值的容差带内
    #[inline]
    pub fn contains(&self, value: f64, target: f64) -> bool {
        let half_width = target.abs() * self.ratio;
        value >= target - half_width && value <= target + half_width
    }

    /// 同时判断 pitch / yaw 两个分量
    pub fn contains_orientation(
        &self,
        pitch: f64,
        yaw: f64,
        target_pitch: f64,
        target_yaw: f64,
    ) -> bool {
        self.contains(yaw, target_yaw) && self.contains(pitch, target_pitch)
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        ToleranceBand::new(DEFAULT_TOLERANCE_RATIO)
    }
}
