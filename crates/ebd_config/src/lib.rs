// crates/ebd_config/src/lib.rs

//! EbDerive Config Layer (Layer 2)
//!
//! 配置层，提供派生场计算所需的全部外部参数记录。
//! 本层完全无泛型，所有数值使用 f64，核函数构建时再转换到目标精度。
//!
//! # 模块概览
//!
//! - [`derive_config`]: DeriveConfig 总配置（执行策略、状态布局、状态方程、启用字段）
//! - [`rotating_frame`]: 旋转坐标系参数
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **显式传参**: 旋转坐标系等参数作为记录显式传入核函数，不使用全局状态
//! 2. **全 f64 配置**: 便于 JSON 序列化
//! 3. **一次验证**: 配置在任何逐单元计算开始之前完成验证

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod derive_config;
pub mod error;
pub mod rotating_frame;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use derive_config::{DeriveConfig, EosConfig, ExecConfig, StateConfig, MAX_SPECIES};
pub use error::ConfigError;
pub use rotating_frame::RotatingFrameConfig;
