// crates/ebd_foundation/src/index.rs

//! 块结构网格索引空间
//!
//! 提供整数索引向量 [`IntVect`]、轴对齐索引盒 [`IndexBox`] 和运行时维度 [`SpaceDim`]。
//!
//! # 约定
//!
//! - 索引向量始终有 3 个分量，低维问题中未激活的轴固定为 0
//! - 索引盒为闭区间 `[lo, hi]`
//! - 线性化采用列主序（`i` 变化最快），与块结构 AMR 数组一致
//!
//! ```
//! use ebd_foundation::index::{IndexBox, IntVect, SpaceDim};
//!
//! let bx = IndexBox::from_extent(SpaceDim::Two, [4, 3, 1]).unwrap();
//! assert_eq!(bx.num_cells(), 12);
//! assert_eq!(bx.offset(IntVect::new(1, 2, 0)), 9);
//! ```

use std::fmt;
use std::ops::{Add, Index, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{EbdError, EbdResult};

/// 最大空间维数
pub const MAX_DIM: usize = 3;

/// 运行时空间维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceDim {
    /// 一维
    One,
    /// 二维
    Two,
    /// 三维
    Three,
}

impl SpaceDim {
    /// 激活轴数量
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// 从轴数量创建
    pub fn from_count(n: usize) -> EbdResult<Self> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(EbdError::out_of_range("dimension", n as f64, 1.0, 3.0)),
        }
    }

    /// 方向 `dir` 是否为激活轴
    #[inline]
    pub const fn has(self, dir: usize) -> bool {
        dir < self.count()
    }

    /// 名称（用于日志）
    pub fn name(self) -> &'static str {
        match self {
            Self::One => "1D",
            Self::Two => "2D",
            Self::Three => "3D",
        }
    }
}

impl fmt::Display for SpaceDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 面方向（负侧 / 正侧）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// 负方向邻居
    Minus,
    /// 正方向邻居
    Plus,
}

impl Side {
    /// 方向符号
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Minus => -1,
            Self::Plus => 1,
        }
    }

    /// 反向
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Self::Minus => Self::Plus,
            Self::Plus => Self::Minus,
        }
    }
}

/// 整数索引向量 `(i, j, k)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntVect(pub [i32; MAX_DIM]);

impl IntVect {
    /// 零向量
    pub const ZERO: Self = Self([0, 0, 0]);

    /// 创建索引向量
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self([i, j, k])
    }

    /// 方向 `dir` 上的单位向量
    #[inline]
    pub fn unit(dir: usize) -> Self {
        let mut v = [0; MAX_DIM];
        v[dir] = 1;
        Self(v)
    }

    /// 沿 `dir` 方向平移 `n`
    #[inline]
    pub fn shifted(self, dir: usize, n: i32) -> Self {
        let mut v = self.0;
        v[dir] += n;
        Self(v)
    }

    /// 把 `dir` 分量替换为 `value`
    #[inline]
    pub fn with(self, dir: usize, value: i32) -> Self {
        let mut v = self.0;
        v[dir] = value;
        Self(v)
    }

    /// 逐分量不大于
    #[inline]
    pub fn all_le(self, other: Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }
}

impl Index<usize> for IntVect {
    type Output = i32;

    #[inline]
    fn index(&self, dir: usize) -> &i32 {
        &self.0[dir]
    }
}

impl Add for IntVect {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1], self.0[2] + rhs.0[2]])
    }
}

impl Sub for IntVect {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl Neg for IntVect {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// 轴对齐整数索引盒（闭区间）
///
/// 构造后不可变。未激活轴的 `lo`/`hi` 必须为 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexBox {
    dim: SpaceDim,
    lo: IntVect,
    hi: IntVect,
}

impl IndexBox {
    /// 创建索引盒
    ///
    /// # 错误
    /// - 激活轴上 `hi < lo`
    /// - 未激活轴上 `lo`/`hi` 不为 0
    pub fn new(dim: SpaceDim, lo: IntVect, hi: IntVect) -> EbdResult<Self> {
        for d in 0..MAX_DIM {
            if dim.has(d) {
                if hi[d] < lo[d] {
                    return Err(EbdError::invalid_box(format!(
                        "轴 {d} 上 hi={} < lo={}",
                        hi[d], lo[d]
                    )));
                }
            } else if lo[d] != 0 || hi[d] != 0 {
                return Err(EbdError::invalid_box(format!(
                    "{dim} 索引盒的未激活轴 {d} 必须为 0"
                )));
            }
        }
        Ok(Self { dim, lo, hi })
    }

    /// 从原点开始、各轴长度为 `n` 的索引盒（未激活轴的长度被忽略）
    pub fn from_extent(dim: SpaceDim, n: [usize; MAX_DIM]) -> EbdResult<Self> {
        let mut hi = IntVect::ZERO;
        for d in 0..dim.count() {
            if n[d] == 0 {
                return Err(EbdError::invalid_box(format!("轴 {d} 长度为 0")));
            }
            hi.0[d] = n[d] as i32 - 1;
        }
        Self::new(dim, IntVect::ZERO, hi)
    }

    /// 空间维度
    #[inline]
    pub fn dim(&self) -> SpaceDim {
        self.dim
    }

    /// 下角点
    #[inline]
    pub fn lo(&self) -> IntVect {
        self.lo
    }

    /// 上角点
    #[inline]
    pub fn hi(&self) -> IntVect {
        self.hi
    }

    /// 方向 `dir` 上的单元数
    #[inline]
    pub fn len(&self, dir: usize) -> usize {
        (self.hi[dir] - self.lo[dir] + 1) as usize
    }

    /// 单元总数
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.len(0) * self.len(1) * self.len(2)
    }

    /// 是否包含索引
    #[inline]
    pub fn contains(&self, iv: IntVect) -> bool {
        self.lo.all_le(iv) && iv.all_le(self.hi)
    }

    /// 是否完全包含另一个索引盒
    #[inline]
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// 在所有激活轴上向外扩展 `n` 层
    pub fn grow(&self, n: i32) -> Self {
        let mut lo = self.lo;
        let mut hi = self.hi;
        for d in 0..self.dim.count() {
            lo.0[d] -= n;
            hi.0[d] += n;
        }
        Self {
            dim: self.dim,
            lo,
            hi,
        }
    }

    /// 列主序线性偏移（调用方保证 `contains(iv)`）
    #[inline]
    pub fn offset(&self, iv: IntVect) -> usize {
        debug_assert!(self.contains(iv), "索引 {iv} 不在 {self} 中");
        let nx = self.len(0);
        let ny = self.len(1);
        let i = (iv[0] - self.lo[0]) as usize;
        let j = (iv[1] - self.lo[1]) as usize;
        let k = (iv[2] - self.lo[2]) as usize;
        i + nx * (j + ny * k)
    }

    /// 由 x 行号（`j + ny * k`）反求该行的 `(j, k)`
    #[inline]
    pub fn row_jk(&self, row: usize) -> (i32, i32) {
        let ny = self.len(1);
        (
            self.lo[1] + (row % ny) as i32,
            self.lo[2] + (row / ny) as i32,
        )
    }

    /// 按列主序遍历所有索引
    pub fn iter(&self) -> impl Iterator<Item = IntVect> + '_ {
        let (lo, hi) = (self.lo, self.hi);
        (lo[2]..=hi[2]).flat_map(move |k| {
            (lo[1]..=hi[1]).flat_map(move |j| (lo[0]..=hi[0]).map(move |i| IntVect::new(i, j, k)))
        })
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lo, self.hi)
    }
}
