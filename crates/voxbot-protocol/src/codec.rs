//! JSON-line 编解码
//!
//! 每条消息编码为单行 JSON，出站消息带 `kind` 标签：
//!
//! ```text
//! {"kind":"motion","x":1.0,"y":64.0,"z":2.0,"pitch":0.0,"yaw":90.0,"jump":false}
//! {"kind":"dig","x":3,"y":63,"z":2,"status":"start","face":"top"}
//! ```

use crate::ProtocolError;
use crate::messages::{Outbound, PoseUpdate};

impl Outbound {
    /// 编码为单行 JSON（不含换行符）
    pub fn to_json_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从单行 JSON 解码
    pub fn from_json_line(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

impl PoseUpdate {
    /// 编码为单行 JSON
    pub fn to_json_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从单行 JSON 解码，拒绝非有限值
    pub fn from_json_line(line: &str) -> Result<Self, ProtocolError> {
        let update: PoseUpdate = serde_json::from_str(line.trim())?;
        crate::ensure_finite("x", update.x)?;
        crate::ensure_finite("y", update.y)?;
        crate::ensure_finite("z", update.z)?;
        crate::ensure_finite("pitch", update.pitch)?;
        crate::ensure_finite("yaw", update.yaw)?;
        Ok(update)
    }
}
