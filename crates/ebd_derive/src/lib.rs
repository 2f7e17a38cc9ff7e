// crates/ebd_derive/src/lib.rs

//! EbDerive Derive Layer (Layer 3)
//!
//! 嵌入边界网格上的派生场计算层。
//!
//! # 模块概览
//!
//! - [`eb`]: 单元连通性标志与标志数组
//! - [`stencil`]: 差分模板选择（中心 / 单侧 / 退化）与连通性分派
//! - [`context`]: 核函数统一接口 [`DeriveKernel`] 与调用上下文
//! - [`kernels`]: 全部派生场核函数
//! - [`eos`]: 状态方程接口与 gamma 律参考实现
//! - [`registry`]: 按名称注册和分派派生场
//! - [`geometry`]/[`layout`]: 网格几何与状态分量布局
//! - [`exec`]: 逐单元数据并行执行
//!
//! # 层级架构
//!
//! ```text
//! Layer 3: ebd_derive     ─> 连通性、模板选择、派生场核函数 (本层)
//! Layer 2: ebd_config     ─> 配置记录
//! Layer 1: ebd_foundation ─> IndexBox, FieldArray, DeriveScalar
//! ```
//!
//! # 示例
//!
//! ```
//! use ebd_config::ExecConfig;
//! use ebd_derive::prelude::*;
//! use ebd_foundation::prelude::*;
//!
//! let bx = IndexBox::from_extent(SpaceDim::One, [5, 1, 1]).unwrap();
//! let layout = StateLayout::default();
//! let state = FieldArray::from_fn(bx, layout.n_var(), |iv, comp| match comp {
//!     URHO => 2.0,
//!     UMX => 2.0 * (iv[0] + 1) as f64,
//!     _ => 0.0,
//! });
//! let geom = Geometry::unit(bx);
//! let exec = ExecConfig::default();
//! let ctx = DeriveContext::new(bx, &state, &layout, &geom, &exec);
//!
//! let mut out = FieldArray::new(bx, 1);
//! Velocity::new(0).unwrap().derive(&ctx, &mut out, 0).unwrap();
//! assert_eq!(out.get(IntVect::new(4, 0, 0), 0), 5.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod eb;
pub mod eos;
pub mod error;
pub mod exec;
pub mod geometry;
pub mod kernels;
pub mod layout;
pub mod registry;
pub mod stencil;

#[cfg(test)]
mod test_support;

/// 层级标识
pub const LAYER: u8 = 3;

pub use context::{DeriveContext, DeriveKernel};
pub use error::{DeriveError, DeriveResult};
pub use registry::{DeriveMeta, DeriveRecord, DeriveRegistry};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::context::{DeriveContext, DeriveKernel};
    pub use crate::eb::{EbCellFlag, EbFlagArray, FabType};
    pub use crate::eos::{EquationOfState, GammaLaw, ThermoPoint};
    pub use crate::error::{DeriveError, DeriveResult};
    pub use crate::geometry::{BcKind, BcRec, Geometry};
    pub use crate::kernels::*;
    pub use crate::layout::{StateLayout, UEDEN, UEINT, UFS, UMX, UMY, UMZ, URHO, UTEMP};
    pub use crate::registry::{DeriveMeta, DeriveRegistry};
    pub use crate::stencil::{select_indices, select_weight, Connectivity, DirStencil};
}
