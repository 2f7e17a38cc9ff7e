// crates/ebd_derive/src/eos/gamma_law.rs

//! 多组分理想气体（常比热比）
//!
//! ```text
//! W_mix = 1 / Σ (Y_n / W_n)
//! R     = R_u / W_mix
//! cv    = R / (γ - 1),   cp = γ cv
//! T     = e / cv,        p  = ρ R T
//! c     = sqrt(γ p / ρ)
//! s     = cv ln T - R ln ρ
//! X_n   = (Y_n / W_n) · W_mix
//! ```
//!
//! 单位制为 CGS。

use ebd_config::EosConfig;
use ebd_foundation::EbdError;

use super::{EquationOfState, ThermoPoint};
use crate::error::DeriveResult;

/// 通用气体常数 [erg/(mol·K)]
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.31446261815324e7;

/// gamma 律状态方程
#[derive(Debug, Clone, PartialEq)]
pub struct GammaLaw {
    gamma: f64,
    inv_mol_weights: Vec<f64>,
}

impl GammaLaw {
    /// 创建
    ///
    /// `gamma > 1`，摩尔质量为正且至少一个组分。
    pub fn new(gamma: f64, mol_weights: &[f64]) -> DeriveResult<Self> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(EbdError::invalid_input(format!("比热比必须大于 1: {gamma}")).into());
        }
        if mol_weights.is_empty() {
            return Err(EbdError::invalid_input("至少需要一个组分").into());
        }
        if let Some(w) = mol_weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(EbdError::invalid_input(format!("摩尔质量必须为正: {w}")).into());
        }
        Ok(Self {
            gamma,
            inv_mol_weights: mol_weights.iter().map(|w| 1.0 / w).collect(),
        })
    }

    /// 从配置创建
    pub fn from_config(config: &EosConfig) -> DeriveResult<Self> {
        Self::new(config.gamma, &config.mol_weights)
    }

    /// 比热比
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// `1 / W_mix`
    #[inline]
    fn inv_mix_weight(&self, mass_frac: &[f64]) -> f64 {
        mass_frac
            .iter()
            .zip(&self.inv_mol_weights)
            .map(|(y, iw)| y * iw)
            .sum()
    }

    /// 混合气体常数
    #[inline]
    fn gas_constant(&self, mass_frac: &[f64]) -> f64 {
        UNIVERSAL_GAS_CONSTANT * self.inv_mix_weight(mass_frac)
    }
}

impl EquationOfState for GammaLaw {
    fn n_species(&self) -> usize {
        self.inv_mol_weights.len()
    }

    fn temperature(&self, pt: &ThermoPoint<'_>) -> f64 {
        pt.e_int / self.cv(pt)
    }

    fn pressure(&self, pt: &ThermoPoint<'_>) -> f64 {
        // ρ R T = ρ (γ - 1) e
        pt.rho * (self.gamma - 1.0) * pt.e_int
    }

    fn sound_speed(&self, pt: &ThermoPoint<'_>) -> f64 {
        (self.gamma * self.pressure(pt) / pt.rho).sqrt()
    }

    fn entropy(&self, pt: &ThermoPoint<'_>) -> f64 {
        let r = self.gas_constant(pt.mass_frac);
        let cv = r / (self.gamma - 1.0);
        cv * self.temperature(pt).ln() - r * pt.rho.ln()
    }

    fn cp(&self, pt: &ThermoPoint<'_>) -> f64 {
        self.gamma * self.cv(pt)
    }

    fn cv(&self, pt: &ThermoPoint<'_>) -> f64 {
        self.gas_constant(pt.mass_frac) / (self.gamma - 1.0)
    }

    fn mole_fractions(&self, mass_frac: &[f64], out: &mut [f64]) {
        let w_mix = 1.0 / self.inv_mix_weight(mass_frac);
        for ((x, y), iw) in out.iter_mut().zip(mass_frac).zip(&self.inv_mol_weights) {
            *x = y * iw * w_mix;
        }
    }
}
