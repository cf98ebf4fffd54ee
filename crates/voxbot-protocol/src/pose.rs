//! 位姿与运动帧

/// 化身位姿
///
/// 位置 + 朝向 + 着地标志。由状态观察器整体写入，
/// 其他组件只读取副本（`Copy`），不存在原地修改。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// 俯仰角（度）
    pub pitch: f64,
    /// 偏航角（度）
    pub yaw: f64,
    /// 是否着地
    pub on_ground: bool,
}

impl Pose {
    /// 创建着地的位姿
    pub fn new(x: f64, y: f64, z: f64, pitch: f64, yaw: f64) -> Self {
        Pose {
            x,
            y,
            z,
            pitch,
            yaw,
            on_ground: true,
        }
    }

    /// 水平面（x-z）上到目标点的直线距离
    pub fn planar_distance_to(&self, x: f64, z: f64) -> f64 {
        (x - self.x).hypot(z - self.z)
    }

    /// 替换朝向，位置不变
    pub fn with_orientation(mut self, pitch: f64, yaw: f64) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

/// 运动帧：一个控制 tick 的目标位姿
///
/// 由轨迹合成器生成，发布一次后即丢弃。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub yaw: f64,
    /// 该 tick 合成的着地状态
    pub on_ground: bool,
    /// 请求是否带跳跃（整段轨迹相同）
    pub jump: bool,
}

impl Frame {
    /// 以位姿为基础构建帧
    pub fn from_pose(pose: &Pose, jump: bool) -> Self {
        Frame {
            x: pose.x,
            y: pose.y,
            z: pose.z,
            pitch: pose.pitch,
            yaw: pose.yaw,
            on_ground: pose.on_ground,
            jump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_default_on_ground() {
        let pose = Pose::default();
        assert!(pose.on_ground);
        assert_eq!(pose.yaw, 0.0);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let pose = Pose::new(1.0, 64.0, 1.0, 0.0, 0.0);
        assert_eq!(pose.planar_distance_to(4.0, 5.0), 5.0);
    }

    #[test]
    fn test_with_orientation_keeps_position() {
        let pose = Pose::new(1.0, 2.0, 3.0, 0.0, 0.0).with_orientation(-30.0, 45.0);
        assert_eq!((pose.x, pose.y, pose.z), (1.0, 2.0, 3.0));
        assert_eq!((pose.pitch, pose.yaw), (-30.0, 45.0));
    }

    #[test]
    fn test_frame_from_pose() {
        let mut pose = Pose::new(1.0, 2.0, 3.0, 10.0, 20.0);
        pose.on_ground = false;
        let frame = Frame::from_pose(&pose, true);
        assert_eq!(frame.x, 1.0);
        assert_eq!(frame.yaw, 20.0);
        assert!(!frame.on_ground);
        assert!(frame.jump);
    }
}
