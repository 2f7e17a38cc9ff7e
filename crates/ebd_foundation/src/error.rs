// crates/ebd_foundation/src/error.rs

//! 错误处理模块，定义基础层统一错误类型
//!
//! 提供 `EbdError` 枚举和 `EbdResult` 类型别名。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义索引空间与数组相关错误，派生场错误在 `ebd_derive` 中定义
//! 2. **易用性**: 提供便捷的构造方法
//!
//! # 示例
//!
//! ```
//! use ebd_foundation::error::{EbdError, EbdResult};
//!
//! fn check(n: usize) -> EbdResult<()> {
//!     EbdError::check_size("state", 8, n)
//! }
//! assert!(check(8).is_ok());
//! assert!(check(3).is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type EbdResult<T> = Result<T, EbdError>;

/// 基础层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EbdError {
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 无效索引盒
    #[error("无效的索引盒: {message}")]
    InvalidBox {
        /// 具体错误信息
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl EbdError {
    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 无效索引盒
    pub fn invalid_box(message: impl Into<String>) -> Self {
        Self::InvalidBox {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl EbdError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> EbdResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> EbdResult<()> {
        if value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> EbdResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}
