// crates/ebd_derive/src/kernels/thermo.rs

//! 热力学派生场
//!
//! 逐单元组装 [`ThermoPoint`] 后委托给状态方程。
//! 质量分数放在栈上定长缓冲区中，不做逐单元堆分配。

use std::sync::Arc;

use ebd_config::MAX_SPECIES;
use ebd_foundation::{DeriveScalar, EbdError, FieldArray, IntVect};
use serde::{Deserialize, Serialize};

use super::{magnitude_sq, momentum_at};
use crate::context::{DeriveContext, DeriveKernel};
use crate::eos::{EquationOfState, ThermoPoint};
use crate::error::DeriveResult;
use crate::exec::fill_component;
use crate::layout::{UEINT, UFS, URHO, UTEMP};

/// 标量热力学量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermoQuantity {
    /// 温度
    Temperature,
    /// 压力
    Pressure,
    /// 声速
    SoundSpeed,
    /// 马赫数 `|u| / c`
    MachNumber,
    /// 比熵
    Entropy,
    /// 定压比热
    Cp,
    /// 定容比热
    Cv,
}

impl ThermoQuantity {
    /// 全部标量热力学量
    pub const ALL: [Self; 7] = [
        Self::Temperature,
        Self::Pressure,
        Self::SoundSpeed,
        Self::MachNumber,
        Self::Entropy,
        Self::Cp,
        Self::Cv,
    ];

    /// 注册名
    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::Pressure => "pressure",
            Self::SoundSpeed => "soundspeed",
            Self::MachNumber => "mach_number",
            Self::Entropy => "entropy",
            Self::Cp => "cp",
            Self::Cv => "cv",
        }
    }

    /// CGS 单位
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "K",
            Self::Pressure => "dyn/cm^2",
            Self::SoundSpeed => "cm/s",
            Self::MachNumber => "-",
            Self::Entropy | Self::Cp | Self::Cv => "erg/(g K)",
        }
    }
}

/// 组装单元热力学状态并调用 `f`
#[inline]
pub(crate) fn with_point<S, R>(ctx: &DeriveContext<'_, S>, iv: IntVect, f: impl FnOnce(&ThermoPoint<'_>) -> R) -> R
where
    S: DeriveScalar,
{
    let rho = ctx.state_at(iv, URHO).as_f64();
    let inv_rho = 1.0 / rho;
    let ns = ctx.layout.n_species();
    let mut y = [0.0; MAX_SPECIES];
    for (n, yn) in y.iter_mut().enumerate().take(ns) {
        *yn = ctx.state_at(iv, UFS + n).as_f64() * inv_rho;
    }
    let pt = ThermoPoint {
        rho,
        e_int: ctx.state_at(iv, UEINT).as_f64() * inv_rho,
        temp_guess: ctx.state_at(iv, UTEMP).as_f64(),
        mass_frac: &y[..ns],
    };
    f(&pt)
}

/// 状态方程组分数须与布局一致
fn check_species<S: DeriveScalar>(eos: &dyn EquationOfState, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
    EbdError::check_size("eos species", ctx.layout.n_species(), eos.n_species())?;
    Ok(())
}

/// 标量热力学量核函数
#[derive(Debug, Clone)]
pub struct Thermo {
    quantity: ThermoQuantity,
    eos: Arc<dyn EquationOfState>,
}

impl Thermo {
    /// 创建
    pub fn new(quantity: ThermoQuantity, eos: Arc<dyn EquationOfState>) -> Self {
        Self { quantity, eos }
    }

    /// 计算的量
    pub fn quantity(&self) -> ThermoQuantity {
        self.quantity
    }

    fn eval<S: DeriveScalar>(&self, ctx: &DeriveContext<'_, S>, iv: IntVect) -> f64 {
        let eos = self.eos.as_ref();
        match self.quantity {
            ThermoQuantity::Temperature => with_point(ctx, iv, |pt| eos.temperature(pt)),
            ThermoQuantity::Pressure => with_point(ctx, iv, |pt| eos.pressure(pt)),
            ThermoQuantity::SoundSpeed => with_point(ctx, iv, |pt| eos.sound_speed(pt)),
            ThermoQuantity::Entropy => with_point(ctx, iv, |pt| eos.entropy(pt)),
            ThermoQuantity::Cp => with_point(ctx, iv, |pt| eos.cp(pt)),
            ThermoQuantity::Cv => with_point(ctx, iv, |pt| eos.cv(pt)),
            ThermoQuantity::MachNumber => {
                let c = with_point(ctx, iv, |pt| eos.sound_speed(pt));
                let speed = magnitude_sq(momentum_at(ctx, iv)).sqrt().as_f64() / ctx.state_at(iv, URHO).as_f64();
                speed / c
            }
        }
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for Thermo {
    fn n_comp(&self) -> usize {
        1
    }

    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        check_species(self.eos.as_ref(), ctx)
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| S::from_config(self.eval(ctx, iv)));
    }
}

/// 摩尔分数，每个组分一个分量
#[derive(Debug, Clone)]
pub struct MoleFrac {
    n_species: usize,
    eos: Arc<dyn EquationOfState>,
}

impl MoleFrac {
    /// 创建
    pub fn new(eos: Arc<dyn EquationOfState>) -> Self {
        Self {
            n_species: eos.n_species(),
            eos,
        }
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for MoleFrac {
    fn n_comp(&self) -> usize {
        self.n_species
    }

    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        check_species(self.eos.as_ref(), ctx)
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let eos = self.eos.as_ref();
        for n in 0..self.n_species {
            fill_component(out, dcomp + n, &ctx.bx, ctx.exec, |iv| {
                let mut x = [0.0; MAX_SPECIES];
                with_point(ctx, iv, |pt| eos.mole_fractions(pt.mass_frac, &mut x[..pt.mass_frac.len()]));
                S::from_config(x[n])
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{GammaLaw, UNIVERSAL_GAS_CONSTANT};
    use crate::error::DeriveError;
    use crate::layout::{StateLayout, UMX};
    use crate::test_support::Fixture;
    use ebd_foundation::SpaceDim;

    fn gas_fixture() -> Fixture {
        let mut fx = Fixture::new(SpaceDim::One, [2, 1, 1], 0, StateLayout::default());
        for i in 0..2 {
            let iv = IntVect::new(i, 0, 0);
            fx.state.set(iv, URHO, 2.0);
            fx.state.set(iv, UEINT, 2.0 * 1.0e9);
            fx.state.set(iv, UFS, 2.0);
            fx.state.set(iv, UMX, 2.0 * 3.0e4);
        }
        fx
    }

    #[test]
    fn test_temperature_and_pressure() {
        let fx = gas_fixture();
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::new(1.4, &[28.97]).unwrap());
        let iv = IntVect::ZERO;

        let t = fx.run(&Thermo::new(ThermoQuantity::Temperature, eos.clone())).unwrap().get(iv, 0);
        let p = fx.run(&Thermo::new(ThermoQuantity::Pressure, eos.clone())).unwrap().get(iv, 0);
        let cv = UNIVERSAL_GAS_CONSTANT / 28.97 / 0.4;
        assert!((t - 1.0e9 / cv).abs() / t < 1e-12);
        assert!((p - 2.0 * 0.4 * 1.0e9).abs() / p < 1e-12);
    }

    #[test]
    fn test_mach_number() {
        let fx = gas_fixture();
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::new(1.4, &[28.97]).unwrap());
        let mach = fx.run(&Thermo::new(ThermoQuantity::MachNumber, eos)).unwrap();
        let c = (1.4 * 0.4 * 1.0e9f64).sqrt();
        assert!((mach.get(IntVect::ZERO, 0) - 3.0e4 / c).abs() < 1e-12);
    }

    #[test]
    fn test_species_mismatch_rejected() {
        let fx = gas_fixture();
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::new(1.4, &[2.0, 32.0]).unwrap());
        assert!(matches!(
            fx.run(&Thermo::new(ThermoQuantity::Cp, eos)),
            Err(DeriveError::Foundation(EbdError::SizeMismatch { .. }))
        ));
    }

    #[test]
    fn test_mole_fractions() {
        let layout = StateLayout::new(2).unwrap();
        let mut fx = Fixture::new(SpaceDim::One, [1, 1, 1], 0, layout);
        fx.state.set(IntVect::ZERO, UFS, 0.5);
        fx.state.set(IntVect::ZERO, UFS + 1, 0.5);
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::new(1.4, &[2.0, 32.0]).unwrap());

        let out = fx.run(&MoleFrac::new(eos)).unwrap();
        assert!((out.get(IntVect::ZERO, 0) - 16.0 / 17.0).abs() < 1e-12);
        assert!((out.get(IntVect::ZERO, 1) - 1.0 / 17.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantity_names() {
        let names: Vec<&str> = ThermoQuantity::ALL.iter().map(|q| q.name()).collect();
        assert_eq!(names, ["temp", "pressure", "soundspeed", "mach_number", "entropy", "cp", "cv"]);
    }
}
