// crates/ebd_derive/src/kernels/mms.rs

//! 人造解误差
//!
//! 输出 `计算值 - 精确值`，精确值在单元中心和调用时间 `ctx.time` 处求得。
//! 压力的计算值经由状态方程得到。

use std::sync::Arc;

use ebd_foundation::{DeriveScalar, EbdError, FieldArray};
use glam::DVec3;

use super::thermo::with_point;
use super::velocity_at;
use crate::context::{DeriveContext, DeriveKernel};
use crate::eos::EquationOfState;
use crate::error::DeriveResult;
use crate::exec::fill_component;
use crate::layout::URHO;

/// 人造解
pub trait ManufacturedSolution: Send + Sync + std::fmt::Debug {
    /// 密度
    fn density(&self, x: DVec3, time: f64) -> f64;

    /// 速度
    fn velocity(&self, x: DVec3, time: f64) -> DVec3;

    /// 压力
    fn pressure(&self, x: DVec3, time: f64) -> f64;
}

/// 误差对应的物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MmsQuantity {
    /// 密度
    Density,
    /// 速度分量
    Velocity(usize),
    /// 压力
    Pressure,
}

impl MmsQuantity {
    /// 全部误差量
    pub const ALL: [Self; 5] = [
        Self::Density,
        Self::Velocity(0),
        Self::Velocity(1),
        Self::Velocity(2),
        Self::Pressure,
    ];

    /// 注册名
    pub fn name(self) -> &'static str {
        match self {
            Self::Density => "rhommserror",
            Self::Velocity(0) => "ummserror",
            Self::Velocity(1) => "vmmserror",
            Self::Velocity(_) => "wmmserror",
            Self::Pressure => "pmmserror",
        }
    }
}

/// 人造解误差核函数
#[derive(Debug, Clone)]
pub struct MmsError {
    quantity: MmsQuantity,
    solution: Arc<dyn ManufacturedSolution>,
    eos: Arc<dyn EquationOfState>,
}

impl MmsError {
    /// 创建
    pub fn new(
        quantity: MmsQuantity,
        solution: Arc<dyn ManufacturedSolution>,
        eos: Arc<dyn EquationOfState>,
    ) -> Self {
        Self {
            quantity,
            solution,
            eos,
        }
    }

    /// 误差量
    pub fn quantity(&self) -> MmsQuantity {
        self.quantity
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for MmsError {
    fn n_comp(&self) -> usize {
        1
    }

    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        if self.quantity == MmsQuantity::Pressure {
            EbdError::check_size("eos species", ctx.layout.n_species(), self.eos.n_species())?;
        }
        Ok(())
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let t = ctx.time;
        let sol = self.solution.as_ref();
        match self.quantity {
            MmsQuantity::Density => fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
                let exact = sol.density(ctx.geom.cell_center(iv), t);
                ctx.state_at(iv, URHO) - S::from_config(exact)
            }),
            MmsQuantity::Velocity(dir) => fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
                let exact = sol.velocity(ctx.geom.cell_center(iv), t)[dir];
                velocity_at(ctx, iv, dir) - S::from_config(exact)
            }),
            MmsQuantity::Pressure => {
                let eos = self.eos.as_ref();
                fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
                    let computed = with_point(ctx, iv, |pt| eos.pressure(pt));
                    let exact = sol.pressure(ctx.geom.cell_center(iv), t);
                    S::from_config(computed - exact)
                })
            }
        }
    }
}
