// crates/ebd_derive/src/eb/flag.rs

//! 单元连通性标志
//!
//! 32 位标志，位布局：
//!
//! ```text
//! bit 0-1   单元类型: 0 = 规则, 1 = 单值切割, 3 = 被覆盖
//! bit 2-4   保留
//! bit 5-31  3×3×3 邻居连通位，偏移 (di, dj, dk) 对应
//!           5 + (di+1) + 3(dj+1) + 9(dk+1)
//! ```

use ebd_foundation::{IntVect, Side};

const TYPE_MASK: u32 = 0b11;
const TYPE_REGULAR: u32 = 0;
const TYPE_SINGLE_VALUED: u32 = 1;
const TYPE_COVERED: u32 = 3;
const NEIGHBOR_SHIFT: u32 = 5;
const ALL_NEIGHBORS: u32 = ((1u32 << 27) - 1) << NEIGHBOR_SHIFT;

/// 单元连通性标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EbCellFlag(u32);

impl EbCellFlag {
    /// 规则单元：与全部邻居连通
    pub const REGULAR: Self = Self(TYPE_REGULAR | ALL_NEIGHBORS);

    /// 被覆盖单元：无物理状态，与任何邻居都不连通
    pub const COVERED: Self = Self(TYPE_COVERED);

    /// 切割单元，初始与全部邻居连通
    pub const fn single_valued() -> Self {
        Self(TYPE_SINGLE_VALUED | ALL_NEIGHBORS)
    }

    /// 原始位
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// 是否规则单元
    #[inline]
    pub const fn is_regular(self) -> bool {
        self.0 & TYPE_MASK == TYPE_REGULAR
    }

    /// 是否切割单元
    #[inline]
    pub const fn is_single_valued(self) -> bool {
        self.0 & TYPE_MASK == TYPE_SINGLE_VALUED
    }

    /// 是否被覆盖
    #[inline]
    pub const fn is_covered(self) -> bool {
        self.0 & TYPE_MASK == TYPE_COVERED
    }

    #[inline]
    fn neighbor_bit(offset: IntVect) -> u32 {
        debug_assert!(offset.0.iter().all(|c| (-1..=1).contains(c)));
        let n = (offset[0] + 1) + 3 * (offset[1] + 1) + 9 * (offset[2] + 1);
        1u32 << (NEIGHBOR_SHIFT + n as u32)
    }

    /// 与偏移 `offset`（各分量取 -1/0/1）处的邻居是否流体连通
    #[inline]
    pub fn is_connected(self, offset: IntVect) -> bool {
        self.0 & Self::neighbor_bit(offset) != 0
    }

    /// 与 `dir` 方向 `side` 侧的面邻居是否流体连通
    #[inline]
    pub fn is_connected_face(self, dir: usize, side: Side) -> bool {
        self.is_connected(IntVect::ZERO.shifted(dir, side.sign()))
    }

    /// 标记与邻居连通
    #[inline]
    pub fn set_connected(&mut self, offset: IntVect) {
        self.0 |= Self::neighbor_bit(offset);
    }

    /// 标记与邻居断开
    #[inline]
    pub fn set_disconnected(&mut self, offset: IntVect) {
        self.0 &= !Self::neighbor_bit(offset);
    }

    /// 链式设置面邻居断开
    pub fn without_face(mut self, dir: usize, side: Side) -> Self {
        self.set_disconnected(IntVect::ZERO.shifted(dir, side.sign()));
        self
    }

    /// 沿 `dir` 镜像：交换负侧与正侧连通位
    pub fn mirrored(self, dir: usize) -> Self {
        let mut out = Self(self.0 & !ALL_NEIGHBORS);
        for dk in -1..=1 {
            for dj in -1..=1 {
                for di in -1..=1 {
                    let off = IntVect::new(di, dj, dk);
                    if self.is_connected(off) {
                        out.set_connected(off.with(dir, -off[dir]));
                    }
                }
            }
        }
        out
    }
}

impl Default for EbCellFlag {
    fn default() -> Self {
        Self::REGULAR
    }
}
