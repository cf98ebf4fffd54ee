//! 运行配置
//!
//! 所有时长在 TOML 中以毫秒表示，缺省字段使用默认值。
//!
//! ```toml
//! [controller]
//! control_period_ms = 500
//! look_timeout_ms = 3000
//! dig_duration_ms = 8000
//! first_pose_poll_ms = 1000
//! tolerance_ratio = 0.05
//! speed = "walk"
//! max_move_frames = 10000
//!
//! [camera]
//! interval_ms = 100
//! enabled = true
//!
//! [simulator.start]
//! x = 0.0
//! y = 64.0
//! z = 0.0
//! pitch = 0.0
//! yaw = 0.0
//! on_ground = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use voxbot_driver::{CameraConfig, SimulatorConfig};
use voxbot_protocol::{DEFAULT_TOLERANCE_RATIO, Pose, SpeedLevel};

use crate::error::ConfigError;

/// 毫秒时长的 serde 适配
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// 视角控制周期
    #[serde(rename = "control_period_ms", with = "duration_ms")]
    pub control_period: Duration,
    /// 视角收敛超时
    #[serde(rename = "look_timeout_ms", with = "duration_ms")]
    pub look_timeout: Duration,
    /// 挖掘后等待时长
    #[serde(rename = "dig_duration_ms", with = "duration_ms")]
    pub dig_duration: Duration,
    /// 等待第一个位姿时的轮询间隔
    #[serde(rename = "first_pose_poll_ms", with = "duration_ms")]
    pub first_pose_poll: Duration,
    /// 收敛容差比例
    pub tolerance_ratio: f64,
    /// 移动速度档位
    pub speed: SpeedLevel,
    /// 单次移动最多发送的帧数，超出时拒绝请求
    pub max_move_frames: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            control_period: Duration::from_millis(500),
            look_timeout: Duration::from_secs(3),
            dig_duration: Duration::from_secs(8),
            first_pose_poll: Duration::from_secs(1),
            tolerance_ratio: DEFAULT_TOLERANCE_RATIO,
            speed: SpeedLevel::Walk,
            max_move_frames: 10_000,
        }
    }
}

/// 相机发布配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,
    pub enabled: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let camera = CameraConfig::default();
        CameraSettings {
            interval: camera.interval,
            enabled: camera.enabled,
        }
    }
}

impl From<&CameraSettings> for CameraConfig {
    fn from(settings: &CameraSettings) -> Self {
        CameraConfig {
            interval: settings.interval,
            enabled: settings.enabled,
        }
    }
}

/// 模拟化身配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// 每条运动命令的最大转向角（度）
    pub max_turn_per_command_deg: Option<f64>,
    /// 初始位姿
    pub start: Pose,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        SimulatorSettings {
            max_turn_per_command_deg: None,
            start: Pose::new(0.0, 64.0, 0.0, 0.0, 0.0),
        }
    }
}

impl From<&SimulatorSettings> for SimulatorConfig {
    fn from(settings: &SimulatorSettings) -> Self {
        SimulatorConfig {
            start: settings.start,
            max_turn_per_command_deg: settings.max_turn_per_command_deg,
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxbotConfig {
    pub controller: ControllerConfig,
    pub camera: CameraSettings,
    pub simulator: SimulatorSettings,
}

impl VoxbotConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: VoxbotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 从文件加载，文件不存在时使用默认配置
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 写入文件（自动创建父目录）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controller;
        for (field, value) in [
            ("controller.control_period_ms", c.control_period),
            ("controller.first_pose_poll_ms", c.first_pose_poll),
            ("camera.interval_ms", self.camera.interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive".to_string(),
                });
            }
        }

        if c.max_move_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "controller.max_move_frames",
                reason: "must be positive".to_string(),
            });
        }

        if !(0.0..1.0).contains(&c.tolerance_ratio) {
            return Err(ConfigError::Invalid {
                field: "controller.tolerance_ratio",
                reason: format!("{} is outside [0, 1)", c.tolerance_ratio),
            });
        }

        if let Some(limit) = self.simulator.max_turn_per_command_deg {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "simulator.max_turn_per_command_deg",
                    reason: format!("{limit} is not a positive angle"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controller_constants() {
        let config = VoxbotConfig::default();
        assert_eq!(config.controller.control_period, Duration::from_millis(500));
        assert_eq!(config.controller.look_timeout, Duration::from_secs(3));
        assert_eq!(config.controller.dig_duration, Duration::from_secs(8));
        assert_eq!(config.camera.interval, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = VoxbotConfig::from_toml_str(
            r#"
            [controller]
            look_timeout_ms = 1500
            speed = "sprint"
            "#,
        )
        .unwrap();

        assert_eq!(config.controller.look_timeout, Duration::from_millis(1500));
        assert_eq!(config.controller.speed, SpeedLevel::Sprint);
        assert_eq!(config.controller.control_period, Duration::from_millis(500));
        assert_eq!(config.simulator, SimulatorSettings::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = VoxbotConfig::default();
        config.controller.tolerance_ratio = 0.1;
        config.simulator.max_turn_per_command_deg = Some(30.0);
        config.simulator.start = Pose::new(10.0, 70.0, -5.0, 15.0, -90.0);

        let text = config.to_toml_string().unwrap();
        assert!(text.contains("control_period_ms = 500"));
        assert_eq!(VoxbotConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = VoxbotConfig::from_toml_str("[controller]\ncontrol_period_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "controller.control_period_ms",
                ..
            }
        ));

        let err = VoxbotConfig::from_toml_str("[controller]\ntolerance_ratio = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = VoxbotConfig::from_toml_str("[controller]\nmax_move_frames = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "controller.max_move_frames",
                ..
            }
        ));

        let err = VoxbotConfig::from_toml_str("[controller]\nspeed = \"run\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = VoxbotConfig::default();
        config.camera.enabled = false;
        config.save(&path).unwrap();

        assert_eq!(VoxbotConfig::load(&path).unwrap(), config);
        assert!(matches!(
            VoxbotConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
        assert_eq!(
            VoxbotConfig::load_or_default(dir.path().join("missing.toml")).unwrap(),
            VoxbotConfig::default()
        );
    }

    #[test]
    fn test_conversions_to_driver_config() {
        let config = VoxbotConfig::default();
        let camera = CameraConfig::from(&config.camera);
        assert_eq!(camera.interval, Duration::from_millis(100));

        let sim = SimulatorConfig::from(&config.simulator);
        assert_eq!(sim.start.y, 64.0);
        assert!(sim.max_turn_per_command_deg.is_none());
    }
}
