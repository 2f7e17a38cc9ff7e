// crates/ebd_derive/src/kernels/algebraic.rs

//! 逐点代数派生场
//!
//! 不需要模板，也不依赖连通性。被覆盖单元上的输出原样传播，
//! 本模块不做任何屏蔽；非正密度会产生非有限值或异号结果，由上层监测发现。

use ebd_foundation::{DeriveScalar, EbdError, FieldArray};

use super::{magnitude_sq, momentum_at};
use crate::context::{DeriveContext, DeriveKernel};
use crate::error::{DeriveError, DeriveResult};
use crate::exec::fill_component;
use crate::layout::{StateLayout, UFS, URHO};

/// 除以密度：输出第 `n` 分量 = `state[start + n] / ρ`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideByRho {
    start: usize,
    count: usize,
}

impl DivideByRho {
    /// 创建核函数，分量区间在构造时对布局检查
    pub fn new(start: usize, count: usize, layout: &StateLayout) -> DeriveResult<Self> {
        layout.check_slice(start, count)?;
        Ok(Self { start, count })
    }

    /// 单个组分的质量分数 `ρY_n / ρ`
    pub fn species(n: usize, layout: &StateLayout) -> DeriveResult<Self> {
        EbdError::check_index("species", n, layout.n_species())?;
        Self::new(UFS + n, 1, layout)
    }

    /// 组分质量分数
    pub fn mass_fractions(layout: &StateLayout) -> Self {
        Self {
            start: layout.species(0),
            count: layout.n_species(),
        }
    }

    /// 起始状态分量
    pub fn start(&self) -> usize {
        self.start
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for DivideByRho {
    fn n_comp(&self) -> usize {
        self.count
    }

    // 构造时的布局未必是调用时的状态
    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        DeriveError::check_components("state", self.start, self.count, ctx.state.n_comp())
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        for n in 0..self.count {
            let src = self.start + n;
            fill_component(out, dcomp + n, &ctx.bx, ctx.exec, |iv| {
                ctx.state_at(iv, src) / ctx.state_at(iv, URHO)
            });
        }
    }
}

/// 占位派生场：不写入任何分量
///
/// 用于登记由其他环节填充的字段，使其可按名称查询元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    n_comp: usize,
}

impl Placeholder {
    /// 创建
    pub fn new(n_comp: usize) -> Self {
        Self { n_comp }
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for Placeholder {
    fn n_comp(&self) -> usize {
        self.n_comp
    }

    fn compute(&self, _ctx: &DeriveContext<'_, S>, _out: &mut FieldArray<S>, _dcomp: usize) {}
}

/// 速度模 `|m| / ρ`
#[derive(Debug, Clone, Copy, Default)]
pub struct MagVel;

impl<S: DeriveScalar> DeriveKernel<S> for MagVel {
    fn n_comp(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            magnitude_sq(momentum_at(ctx, iv)).sqrt() / ctx.state_at(iv, URHO)
        });
    }
}

/// 动量模 `|m|`
#[derive(Debug, Clone, Copy, Default)]
pub struct MagMom;

impl<S: DeriveScalar> DeriveKernel<S> for MagMom {
    fn n_comp(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            magnitude_sq(momentum_at(ctx, iv)).sqrt()
        });
    }
}

/// 动能密度 `0.5 |m|² / ρ`
#[derive(Debug, Clone, Copy, Default)]
pub struct KineticEnergy;

impl<S: DeriveScalar> DeriveKernel<S> for KineticEnergy {
    fn n_comp(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            S::HALF * magnitude_sq(momentum_at(ctx, iv)) / ctx.state_at(iv, URHO)
        });
    }
}

/// 密度常用对数 `log10(ρ)`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDensity;

impl<S: DeriveScalar> DeriveKernel<S> for LogDensity {
    fn n_comp(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| ctx.state_at(iv, URHO).log10());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use crate::layout::{UMX, UMY};
    use ebd_foundation::{IntVect, SpaceDim};

    #[test]
    fn test_divide_by_rho_slice() {
        // ρ = 2, 切片 [4, 6] -> [2, 3]
        let layout = StateLayout::new(2).unwrap();
        let mut fx = Fixture::new(SpaceDim::One, [1, 1, 1], 0, layout);
        let iv = IntVect::ZERO;
        fx.state.set(iv, URHO, 2.0);
        fx.state.set(iv, UFS, 4.0);
        fx.state.set(iv, UFS + 1, 6.0);

        let kernel = DivideByRho::new(UFS, 2, &layout).unwrap();
        let out = fx.run(&kernel).unwrap();
        assert_eq!(out.get(iv, 0), 2.0);
        assert_eq!(out.get(iv, 1), 3.0);
    }

    #[test]
    fn test_divide_by_rho_rejects_bad_slice() {
        let layout = StateLayout::new(2).unwrap();
        assert!(DivideByRho::new(UFS + 1, 2, &layout).is_err());
        assert!(DivideByRho::new(UFS, 2, &layout).is_ok());
    }

    #[test]
    fn test_slice_checked_against_call_state() {
        // 按 3 组分构建，在 1 组分状态上调用
        let wide = StateLayout::new(3).unwrap();
        let kernel = DivideByRho::new(UFS, 3, &wide).unwrap();
        let fx = Fixture::new(SpaceDim::Two, [2, 2, 1], 0, StateLayout::default());

        let mut out = FieldArray::filled(fx.bx, 3, -1.0);
        assert!(matches!(
            kernel.derive(&fx.ctx(), &mut out, 0),
            Err(DeriveError::ComponentRange { what: "state", .. })
        ));
        assert!(fx.bx.iter().all(|iv| out.get(iv, 0) == -1.0));
    }

    #[test]
    fn test_single_species_fraction() {
        let layout = StateLayout::new(3).unwrap();
        let mut fx = Fixture::new(SpaceDim::One, [2, 1, 1], 0, layout);
        for iv in fx.bx.iter().collect::<Vec<_>>() {
            fx.state.set(iv, URHO, 4.0);
            fx.state.set(iv, UFS + 1, 1.0);
        }
        let out = fx.run(&DivideByRho::species(1, &layout).unwrap()).unwrap();
        assert_eq!(out.n_comp(), 1);
        assert_eq!(out.get(IntVect::new(1, 0, 0), 0), 0.25);

        assert!(DivideByRho::species(3, &layout).is_err());
    }

    #[test]
    fn test_placeholder_writes_nothing() {
        let fx = Fixture::new(SpaceDim::One, [3, 1, 1], 0, StateLayout::default());
        let mut out = FieldArray::filled(fx.bx, 2, 7.0);
        Placeholder::default().derive(&fx.ctx(), &mut out, 1).unwrap();
        assert!(fx.bx.iter().all(|iv| out.get(iv, 0) == 7.0 && out.get(iv, 1) == 7.0));
        assert_eq!(DeriveKernel::<f64>::n_comp(&Placeholder::default()), 1);
    }

    #[test]
    fn test_zero_density_is_not_masked() {
        let layout = StateLayout::default();
        let mut fx = Fixture::new(SpaceDim::One, [2, 1, 1], 0, layout);
        fx.state.set(IntVect::new(1, 0, 0), URHO, 0.0);
        fx.state.set(IntVect::new(1, 0, 0), UFS, 1.0);

        let out = fx.run(&DivideByRho::mass_fractions(&layout)).unwrap();
        assert_eq!(out.get(IntVect::ZERO, 0), 0.0);
        assert!(!out.get(IntVect::new(1, 0, 0), 0).is_finite());
    }

    #[test]
    fn test_magnitudes_and_energy() {
        let layout = StateLayout::default();
        let mut fx = Fixture::new(SpaceDim::Two, [1, 1, 1], 0, layout);
        let iv = IntVect::ZERO;
        fx.state.set(iv, URHO, 2.0);
        fx.state.set(iv, UMX, 6.0);
        fx.state.set(iv, UMY, 8.0);

        assert!((fx.run(&MagMom).unwrap().get(iv, 0) - 10.0).abs() < 1e-12);
        assert!((fx.run(&MagVel).unwrap().get(iv, 0) - 5.0).abs() < 1e-12);
        assert!((fx.run(&KineticEnergy).unwrap().get(iv, 0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_density() {
        let layout = StateLayout::default();
        let mut fx = Fixture::new(SpaceDim::One, [1, 1, 1], 0, layout);
        fx.state.set(IntVect::ZERO, URHO, 1000.0);
        assert!((fx.run(&LogDensity).unwrap().get(IntVect::ZERO, 0) - 3.0).abs() < 1e-12);
    }
}
