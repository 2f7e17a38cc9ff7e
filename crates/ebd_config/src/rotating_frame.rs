// crates/ebd_config/src/rotating_frame.rs

//! 旋转坐标系参数
//!
//! 刚体旋转参考系：绕固定轴以恒定角速度旋转。
//! 速度派生场在启用时叠加 `Ω × r` 修正项，其中
//! `Ω = omega · e_axis`，`r` 为单元中心相对旋转轴位置的矢量。
//!
//! 本记录只描述参数本身；是否与空间维度匹配（仅 3D 有效）
//! 由派生层在构建核函数时检查。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 旋转坐标系配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatingFrameConfig {
    /// 是否启用
    #[serde(default)]
    pub enabled: bool,

    /// 旋转轴方向（0 = x, 1 = y, 2 = z）
    #[serde(default = "default_axis")]
    pub axis: usize,

    /// 角速度 [rad/s]
    #[serde(default)]
    pub omega: f64,

    /// 旋转轴经过的点
    #[serde(default)]
    pub axis_loc: [f64; 3],
}

fn default_axis() -> usize { 2 }

impl Default for RotatingFrameConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            axis: default_axis(),
            omega: 0.0,
            axis_loc: [0.0; 3],
        }
    }
}

impl RotatingFrameConfig {
    /// 创建启用的旋转坐标系
    pub fn new(axis: usize, omega: f64, axis_loc: [f64; 3]) -> Self {
        Self {
            enabled: true,
            axis,
            omega,
            axis_loc,
        }
    }

    /// 设置启用状态
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axis >= 3 {
            return Err(ConfigError::invalid(
                "rotating_frame.axis",
                self.axis,
                "旋转轴必须为 0、1 或 2",
            ));
        }
        if !self.omega.is_finite() {
            return Err(ConfigError::invalid(
                "rotating_frame.omega",
                self.omega,
                "角速度必须为有限值",
            ));
        }
        if self.axis_loc.iter().any(|x| !x.is_finite()) {
            return Err(ConfigError::invalid(
                "rotating_frame.axis_loc",
                format!("{:?}", self.axis_loc),
                "旋转轴位置必须为有限值",
            ));
        }
        Ok(())
    }
}
