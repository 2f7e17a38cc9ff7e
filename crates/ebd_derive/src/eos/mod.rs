// crates/ebd_derive/src/eos/mod.rs

//! 状态方程接口
//!
//! 热力学类派生场通过 [`EquationOfState`] 获取温度、压力、声速等量。
//! 接口在 f64 下工作，与网格标量类型无关；输入为单元上的
//! 密度、比内能、温度初值与质量分数。
//!
//! [`GammaLaw`] 是多组分理想气体的参考实现。

mod gamma_law;

pub use gamma_law::{GammaLaw, UNIVERSAL_GAS_CONSTANT};

/// 单元热力学状态
#[derive(Debug, Clone, Copy)]
pub struct ThermoPoint<'a> {
    /// 密度
    pub rho: f64,
    /// 比内能 `ρe / ρ`
    pub e_int: f64,
    /// 温度初值（迭代型状态方程使用）
    pub temp_guess: f64,
    /// 质量分数 `ρY_n / ρ`
    pub mass_frac: &'a [f64],
}

/// 状态方程
pub trait EquationOfState: Send + Sync + std::fmt::Debug {
    /// 组分数
    fn n_species(&self) -> usize;

    /// 温度
    fn temperature(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 压力
    fn pressure(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 声速
    fn sound_speed(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 比熵
    fn entropy(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 定压比热
    fn cp(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 定容比热
    fn cv(&self, pt: &ThermoPoint<'_>) -> f64;

    /// 质量分数转摩尔分数，`out.len() == mass_frac.len()`
    fn mole_fractions(&self, mass_frac: &[f64], out: &mut [f64]);
}
