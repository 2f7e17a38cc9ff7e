// crates/ebd_derive/src/layout.rs

//! 守恒状态分量布局
//!
//! 状态数组各分量具有固定语义和稳定偏移：
//!
//! ```text
//! URHO  = 0         密度 ρ
//! UMX   = 1..=3     动量 ρu, ρv, ρw（低维问题同样保留三个分量）
//! UEDEN = 4         总能 ρE
//! UEINT = 5         内能 ρe
//! UTEMP = 6         温度（状态方程迭代初值）
//! UFS   = 7..       组分分密度 ρY_n
//! NVAR  = UFS + n_species
//! ```

use ebd_config::{StateConfig, MAX_SPECIES};
use ebd_foundation::EbdError;

use crate::error::{DeriveError, DeriveResult};

/// 密度
pub const URHO: usize = 0;
/// x 动量（y、z 动量依次为 `UMX + 1`、`UMX + 2`）
pub const UMX: usize = 1;
/// y 动量
pub const UMY: usize = 2;
/// z 动量
pub const UMZ: usize = 3;
/// 总能
pub const UEDEN: usize = 4;
/// 内能
pub const UEINT: usize = 5;
/// 温度
pub const UTEMP: usize = 6;
/// 第一个组分
pub const UFS: usize = 7;

/// 状态布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    n_species: usize,
}

impl StateLayout {
    /// 创建布局
    ///
    /// 组分数必须在 `[1, MAX_SPECIES]` 范围内。
    pub fn new(n_species: usize) -> DeriveResult<Self> {
        if n_species == 0 || n_species > MAX_SPECIES {
            return Err(EbdError::out_of_range(
                "n_species",
                n_species as f64,
                1.0,
                MAX_SPECIES as f64,
            )
            .into());
        }
        Ok(Self { n_species })
    }

    /// 从配置创建
    pub fn from_config(config: &StateConfig) -> DeriveResult<Self> {
        Self::new(config.n_species)
    }

    /// 组分数
    #[inline]
    pub fn n_species(&self) -> usize {
        self.n_species
    }

    /// 状态分量总数
    #[inline]
    pub fn n_var(&self) -> usize {
        UFS + self.n_species
    }

    /// 方向 `dir` 的动量分量
    #[inline]
    pub fn momentum(&self, dir: usize) -> usize {
        debug_assert!(dir < 3);
        UMX + dir
    }

    /// 第 `n` 个组分的分量
    #[inline]
    pub fn species(&self, n: usize) -> usize {
        debug_assert!(n < self.n_species);
        UFS + n
    }

    /// 检查 `[start, start + count)` 落在布局内
    pub fn check_slice(&self, start: usize, count: usize) -> DeriveResult<()> {
        DeriveError::check_components("state layout", start, count, self.n_var())
    }

    /// 检查状态数组分量数与布局一致
    pub fn check_state(&self, n_comp: usize) -> DeriveResult<()> {
        if n_comp < self.n_var() {
            return Err(EbdError::size_mismatch("state components", self.n_var(), n_comp).into());
        }
        Ok(())
    }
}

impl Default for StateLayout {
    fn default() -> Self {
        Self { n_species: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let layout = StateLayout::new(3).unwrap();
        assert_eq!(layout.n_var(), 10);
        assert_eq!(layout.momentum(2), UMZ);
        assert_eq!(layout.species(2), 9);
    }

    #[test]
    fn test_species_bounds() {
        assert!(StateLayout::new(0).is_err());
        assert!(StateLayout::new(MAX_SPECIES + 1).is_err());
    }

    #[test]
    fn test_check_slice() {
        let layout = StateLayout::default();
        assert!(layout.check_slice(UFS, 1).is_ok());
        assert!(layout.check_slice(UFS, 2).is_err());
        assert!(layout.check_state(8).is_ok());
        assert!(layout.check_state(7).is_err());
    }
}
