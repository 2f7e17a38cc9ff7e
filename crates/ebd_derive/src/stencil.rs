// crates/ebd_derive/src/stencil.rs

//! 嵌入边界感知的差分模板选择
//!
//! 对每个单元和每个方向，决定哪些邻居可以参与差分，以及差分的归一化权重。
//! 三种形态统一处理：
//!
//! ```text
//! 中心差分  两侧都连通   ip - im = 2   w = 0.5
//! 单侧差分  仅一侧连通   ip - im = 1   w = 1
//! 退化      被覆盖/孤立  ip - im = 0   w = 0
//! ```
//!
//! # 归一化约定
//!
//! 方向导数统一写作 `w · (f(ip) - f(im)) / Δx`，分母固定为单倍间距，
//! 中心/单侧的差异完全由权重承担。规则网格上它等于经典中心差分
//! `(f(i+1) - f(i-1)) / (2Δx)`。
//!
//! 调用方不得自行特判被覆盖或切割单元，只需乘以权重；
//! 权重为 0 时导数恒为 0，且不会读取场值。

use ebd_foundation::{DeriveScalar, IntVect, Side};

use crate::eb::{EbCellFlag, EbFlagArray};

/// 经典中心差分下标
#[inline]
pub fn centered_indices(i: i32) -> (i32, i32) {
    (i - 1, i + 1)
}

/// 选择 `dir` 方向差分使用的一对下标 `(im, ip)`
///
/// - `all_regular` 为真：`(i-1, i+1)`，忽略 `flag`
/// - 被覆盖单元：`(i, i)`
/// - 其他：与负侧邻居连通则 `im = i-1`，否则 `im = i`；正侧同理
#[inline]
pub fn select_indices(i: i32, dir: usize, all_regular: bool, flag: EbCellFlag) -> (i32, i32) {
    if all_regular {
        return centered_indices(i);
    }
    if flag.is_covered() {
        return (i, i);
    }
    let im = i - flag.is_connected_face(dir, Side::Minus) as i32;
    let ip = i + flag.is_connected_face(dir, Side::Plus) as i32;
    (im, ip)
}

/// 与下标跨度匹配的归一化权重：跨度 0 → 0，1 → 1，2 → 0.5
#[inline]
pub fn select_weight<S: DeriveScalar>(im: i32, ip: i32) -> S {
    match ip - im {
        0 => S::ZERO,
        1 => S::ONE,
        _ => S::HALF,
    }
}

/// 单个方向上的差分模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirStencil {
    /// 差分方向
    pub dir: usize,
    /// 负侧单元
    pub minus: IntVect,
    /// 正侧单元
    pub plus: IntVect,
}

impl DirStencil {
    /// 由单元与下标对构造
    #[inline]
    pub fn new(iv: IntVect, dir: usize, (im, ip): (i32, i32)) -> Self {
        Self {
            dir,
            minus: iv.with(dir, im),
            plus: iv.with(dir, ip),
        }
    }

    /// 下标跨度（0、1 或 2）
    #[inline]
    pub fn span(&self) -> i32 {
        self.plus[self.dir] - self.minus[self.dir]
    }

    /// 归一化权重
    #[inline]
    pub fn weight<S: DeriveScalar>(&self) -> S {
        select_weight(self.minus[self.dir], self.plus[self.dir])
    }

    /// 是否退化（导数恒为 0）
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0
    }

    /// 方向导数 `w · (f(plus) - f(minus)) · inv_dx`
    ///
    /// 退化模板直接返回 0，不调用 `f`。
    #[inline]
    pub fn derivative<S: DeriveScalar>(&self, inv_dx: S, f: impl Fn(IntVect) -> S) -> S {
        if self.is_degenerate() {
            return S::ZERO;
        }
        self.weight::<S>() * (f(self.plus) - f(self.minus)) * inv_dx
    }
}

/// 连通性分派：全规则快速路径 / 逐单元查表路径
///
/// `AllRegular` 完全跳过标志查找，直接使用经典中心模板；
/// `PerCell` 对每个单元查询标志。两条路径在规则单元上结果一致。
#[derive(Debug, Clone, Copy)]
pub enum Connectivity<'a> {
    /// 本块不含切割或被覆盖单元
    AllRegular,
    /// 逐单元查询连通性
    PerCell(&'a EbFlagArray),
}

impl<'a> Connectivity<'a> {
    /// 由可选标志数组选择分派路径
    pub fn from_flags(flags: Option<&'a EbFlagArray>) -> Self {
        match flags {
            Some(f) if !f.all_regular() => Self::PerCell(f),
            _ => Self::AllRegular,
        }
    }

    /// 是否走快速路径
    #[inline]
    pub fn is_all_regular(&self) -> bool {
        matches!(self, Self::AllRegular)
    }

    /// 单元是否被覆盖
    #[inline]
    pub fn is_covered(&self, iv: IntVect) -> bool {
        match self {
            Self::AllRegular => false,
            Self::PerCell(flags) => flags.is_covered(iv),
        }
    }

    /// `iv` 处 `dir` 方向的模板
    #[inline]
    pub fn stencil(&self, iv: IntVect, dir: usize) -> DirStencil {
        let ids = match self {
            Self::AllRegular => centered_indices(iv[dir]),
            Self::PerCell(flags) => select_indices(iv[dir], dir, false, flags.get(iv)),
        };
        DirStencil::new(iv, dir, ids)
    }

    /// `iv` 处 `dir` 方向的导数
    #[inline]
    pub fn derivative<S: DeriveScalar>(
        &self,
        iv: IntVect,
        dir: usize,
        inv_dx: S,
        f: impl Fn(IntVect) -> S,
    ) -> S {
        self.stencil(iv, dir).derivative(inv_dx, f)
    }
}
