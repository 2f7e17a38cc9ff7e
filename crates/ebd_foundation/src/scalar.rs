// crates/ebd_foundation/src/scalar.rs

//! DeriveScalar - 密封的标量类型抽象
//!
//! 派生场核函数在 f32 和 f64 之间零成本切换的唯一接口。
//!
//! # 设计原则
//!
//! 1. **密封 Trait**: 只有 f32 和 f64 可以实现（通过 private::Sealed）
//! 2. **零成本抽象**: `#[inline]` + 编译期单态化
//! 3. **从配置转换**: `from_config(f64)` 用于从配置层（全 f64）转换
//!
//! ```rust
//! use ebd_foundation::DeriveScalar;
//!
//! fn kinetic<S: DeriveScalar>(rho: S, u: S) -> S {
//!     S::HALF * rho * u * u
//! }
//! assert_eq!(kinetic(2.0f64, 3.0), 9.0);
//! ```

use std::fmt::{Debug, Display};
use std::iter::Sum;

use bytemuck::Pod;
use num_traits::{Float, FromPrimitive, NumAssign};

/// 密封模块，禁止外部实现
mod private {
    /// 密封 trait
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// 派生场标量类型（密封，仅 f32/f64 可实现）
///
/// 所有核函数以 `<S: DeriveScalar>` 作为泛型边界。
/// 几何量（网格间距、单元中心坐标）始终以 f64 保存，
/// 进入核函数时通过 [`DeriveScalar::from_config`] 转换。
pub trait DeriveScalar:
    private::Sealed
    + Pod
    + Float
    + FromPrimitive
    + NumAssign
    + Debug
    + Display
    + Send
    + Sync
    + Sum
    + Default
    + 'static
{
    /// 零值
    const ZERO: Self;
    /// 一
    const ONE: Self;
    /// 二
    const TWO: Self;
    /// 二分之一
    const HALF: Self;

    /// 从配置层 f64 转换
    fn from_config(v: f64) -> Self;

    /// 转换为 f64（用于状态方程等 f64 协作方）
    fn as_f64(self) -> f64;

    /// 检查是否有限（非 NaN、非 Inf）
    #[inline]
    fn is_safe(self) -> bool {
        self.is_finite()
    }

    /// 近似相等判断
    #[inline]
    fn approx_eq(self, other: Self, epsilon: Self) -> bool {
        (self - other).abs() < epsilon
    }
}

impl DeriveScalar for f32 {
    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;
    const TWO: f32 = 2.0;
    const HALF: f32 = 0.5;

    #[inline]
    fn from_config(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl DeriveScalar for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;
    const TWO: f64 = 2.0;
    const HALF: f64 = 0.5;

    #[inline]
    fn from_config(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
