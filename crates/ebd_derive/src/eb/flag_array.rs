// crates/ebd_derive/src/eb/flag_array.rs

//! 网格块上的连通性标志数组
//!
//! 由嵌入边界几何引擎每个网格块生成一次，核函数调用期间只读。
//! 构造时汇总出 [`FabType`]，`all_regular()` 即全局规则性标志。

use ebd_foundation::{IndexBox, IntVect, Side};

use super::flag::EbCellFlag;
use crate::error::{DeriveError, DeriveResult};

/// 网格块汇总类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FabType {
    /// 全部为规则单元
    Regular,
    /// 含切割单元或规则/被覆盖混合
    SingleValued,
    /// 全部被覆盖
    Covered,
}

/// 连通性标志数组
#[derive(Debug, Clone, PartialEq)]
pub struct EbFlagArray {
    bx: IndexBox,
    flags: Vec<EbCellFlag>,
    fab_type: FabType,
}

impl EbFlagArray {
    /// 由逐单元标志构造
    pub fn from_flags(bx: IndexBox, flags: Vec<EbCellFlag>) -> DeriveResult<Self> {
        if flags.len() != bx.num_cells() {
            return Err(ebd_foundation::EbdError::size_mismatch(
                "eb flags",
                bx.num_cells(),
                flags.len(),
            )
            .into());
        }
        let fab_type = Self::classify(&flags);
        Ok(Self { bx, flags, fab_type })
    }

    /// 全部规则单元
    pub fn all_regular_box(bx: IndexBox) -> Self {
        Self {
            bx,
            flags: vec![EbCellFlag::REGULAR; bx.num_cells()],
            fab_type: FabType::Regular,
        }
    }

    /// 由固体掩码构造（嵌入边界几何的简化替身）
    ///
    /// - 掩码为真的单元被覆盖
    /// - 非覆盖单元与盒内非覆盖邻居连通，与被覆盖邻居及盒外邻居断开
    /// - 存在断开面邻居的非覆盖单元标为切割单元
    pub fn from_covered_mask(bx: IndexBox, covered: impl Fn(IntVect) -> bool) -> Self {
        let dim = bx.dim();
        let is_fluid = |iv: IntVect| bx.contains(iv) && !covered(iv);

        let flags = bx
            .iter()
            .map(|iv| {
                if covered(iv) {
                    return EbCellFlag::COVERED;
                }
                let mut flag = EbCellFlag::single_valued();
                let mut cut = false;
                for dk in -1..=1i32 {
                    for dj in -1..=1i32 {
                        for di in -1..=1i32 {
                            let off = IntVect::new(di, dj, dk);
                            let inactive = (0..3).any(|d| !dim.has(d) && off[d] != 0);
                            if inactive || !is_fluid(iv + off) {
                                flag.set_disconnected(off);
                            }
                        }
                    }
                }
                for d in 0..dim.count() {
                    for side in [Side::Minus, Side::Plus] {
                        if !flag.is_connected_face(d, side) {
                            cut = true;
                        }
                    }
                }
                if cut {
                    flag
                } else {
                    EbCellFlag::REGULAR
                }
            })
            .collect::<Vec<_>>();

        let fab_type = Self::classify(&flags);
        Self { bx, flags, fab_type }
    }

    fn classify(flags: &[EbCellFlag]) -> FabType {
        if flags.iter().all(|f| f.is_regular()) {
            FabType::Regular
        } else if flags.iter().all(|f| f.is_covered()) {
            FabType::Covered
        } else {
            FabType::SingleValued
        }
    }

    /// 标志所在索引盒
    #[inline]
    pub fn index_box(&self) -> &IndexBox {
        &self.bx
    }

    /// 汇总类型
    #[inline]
    pub fn fab_type(&self) -> FabType {
        self.fab_type
    }

    /// 全局规则性标志：本块不含切割或被覆盖单元
    #[inline]
    pub fn all_regular(&self) -> bool {
        self.fab_type == FabType::Regular
    }

    /// 单元标志（调用方保证在盒内）
    #[inline]
    pub fn get(&self, iv: IntVect) -> EbCellFlag {
        self.flags[self.bx.offset(iv)]
    }

    /// 单元是否被覆盖
    #[inline]
    pub fn is_covered(&self, iv: IntVect) -> bool {
        self.get(iv).is_covered()
    }

    /// 替换单元标志并重新汇总
    pub fn set(&mut self, iv: IntVect, flag: EbCellFlag) -> DeriveResult<()> {
        if !self.bx.contains(iv) {
            return Err(DeriveError::BoxNotCovered {
                what: "eb flags",
                need: IndexBox::new(self.bx.dim(), iv, iv)?,
                have: self.bx,
            });
        }
        let idx = self.bx.offset(iv);
        self.flags[idx] = flag;
        self.fab_type = Self::classify(&self.flags);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebd_foundation::SpaceDim;

    #[test]
    fn test_all_regular_box() {
        let bx = IndexBox::from_extent(SpaceDim::Two, [3, 3, 1]).unwrap();
        let flags = EbFlagArray::all_regular_box(bx);
        assert!(flags.all_regular());
        assert!(flags.get(IntVect::new(1, 1, 0)).is_regular());
    }

    #[test]
    fn test_empty_mask_is_regular_inside() {
        let bx = IndexBox::from_extent(SpaceDim::One, [5, 1, 1]).unwrap();
        let flags = EbFlagArray::from_covered_mask(bx, |_| false);
        // 盒边界单元的外侧邻居不在盒内，因此标为切割单元
        assert_eq!(flags.fab_type(), FabType::SingleValued);
        assert!(flags.get(IntVect::new(2, 0, 0)).is_regular());
        let edge = flags.get(IntVect::new(0, 0, 0));
        assert!(edge.is_single_valued());
        assert!(!edge.is_connected_face(0, Side::Minus));
        assert!(edge.is_connected_face(0, Side::Plus));
    }

    #[test]
    fn test_covered_cell_neighbors() {
        let bx = IndexBox::from_extent(SpaceDim::One, [5, 1, 1]).unwrap();
        let flags = EbFlagArray::from_covered_mask(bx, |iv| iv[0] == 2);
        assert!(flags.is_covered(IntVect::new(2, 0, 0)));
        let left = flags.get(IntVect::new(1, 0, 0));
        assert!(left.is_connected_face(0, Side::Minus));
        assert!(!left.is_connected_face(0, Side::Plus));
        let right = flags.get(IntVect::new(3, 0, 0));
        assert!(!right.is_connected_face(0, Side::Minus));
        assert!(right.is_connected_face(0, Side::Plus));
    }

    #[test]
    fn test_set_reclassifies() {
        let bx = IndexBox::from_extent(SpaceDim::One, [3, 1, 1]).unwrap();
        let mut flags = EbFlagArray::all_regular_box(bx);
        flags.set(IntVect::new(1, 0, 0), EbCellFlag::COVERED).unwrap();
        assert!(!flags.all_regular());
        assert!(flags.set(IntVect::new(5, 0, 0), EbCellFlag::COVERED).is_err());
    }

    #[test]
    fn test_size_mismatch() {
        let bx = IndexBox::from_extent(SpaceDim::One, [3, 1, 1]).unwrap();
        assert!(EbFlagArray::from_flags(bx, vec![EbCellFlag::REGULAR; 2]).is_err());
    }
}
