// crates/ebd_foundation/src/lib.rs

//! EbDerive Foundation Layer (Layer 1)
//!
//! 基础层，提供块结构网格派生场计算的基础抽象。
//!
//! # 模块概览
//!
//! - [`index`]: 索引向量、索引盒和运行时维度
//! - [`array`]: 多分量稠密场数组
//! - [`scalar`]: 密封标量 trait（f32/f64）
//! - [`error`]: 统一错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 3: ebd_derive     ─> 连通性、模板选择、派生场核函数
//! Layer 2: ebd_config     ─> 配置记录
//! Layer 1: ebd_foundation ─> IndexBox, FieldArray, DeriveScalar (本层)
//! ```
//!
//! # 示例
//!
//! ```
//! use ebd_foundation::prelude::*;
//!
//! let bx = IndexBox::from_extent(SpaceDim::One, [5, 1, 1]).unwrap();
//! let state = FieldArray::<f64>::filled(bx, 4, 1.0);
//! assert_eq!(state.get(IntVect::new(4, 0, 0), 3), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod error;
pub mod index;
pub mod scalar;

/// 层级标识
pub const LAYER: u8 = 1;

// 重导出常用类型
pub use array::FieldArray;
pub use error::{EbdError, EbdResult};
pub use index::{IndexBox, IntVect, Side, SpaceDim, MAX_DIM};
pub use scalar::DeriveScalar;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::array::FieldArray;
    pub use crate::error::{EbdError, EbdResult};
    pub use crate::index::{IndexBox, IntVect, Side, SpaceDim, MAX_DIM};
    pub use crate::scalar::DeriveScalar;
}
