// crates/ebd_derive/src/kernels/mod.rs

//! 派生场核函数
//!
//! # 分类
//!
//! - [`algebraic`]: 逐点代数量（质量分数、速度模、动能、对数密度）
//! - [`velocity`]: 速度分量（可选旋转坐标系）、径向速度、坐标
//! - [`gradient`]: 基于模板选择的差分量（涡量模、散度、涡拟能）
//! - [`thermo`]: 经由状态方程的热力学量
//! - [`mms`]: 人造解误差
//!
//! 所有核函数实现 [`DeriveKernel`](crate::context::DeriveKernel)。

pub mod algebraic;
pub mod gradient;
pub mod mms;
pub mod thermo;
pub mod velocity;

pub use algebraic::{DivideByRho, KineticEnergy, LogDensity, MagMom, MagVel, Placeholder};
pub use gradient::{DivU, Enstrophy, MagVort};
pub use mms::{ManufacturedSolution, MmsError, MmsQuantity};
pub use thermo::{MoleFrac, Thermo, ThermoQuantity};
pub use velocity::{Coordinates, RadialVelocity, RotatingFrame, Velocity};

use ebd_foundation::{DeriveScalar, IntVect};

use crate::context::DeriveContext;
use crate::layout::{UMX, URHO};

/// 单元动量三分量
#[inline]
pub(crate) fn momentum_at<S: DeriveScalar>(ctx: &DeriveContext<'_, S>, iv: IntVect) -> [S; 3] {
    [
        ctx.state_at(iv, UMX),
        ctx.state_at(iv, UMX + 1),
        ctx.state_at(iv, UMX + 2),
    ]
}

/// 单元速度分量 `m_d / ρ`
#[inline]
pub(crate) fn velocity_at<S: DeriveScalar>(ctx: &DeriveContext<'_, S>, iv: IntVect, dir: usize) -> S {
    ctx.state_at(iv, UMX + dir) / ctx.state_at(iv, URHO)
}

#[inline]
pub(crate) fn magnitude_sq<S: DeriveScalar>(v: [S; 3]) -> S {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}
