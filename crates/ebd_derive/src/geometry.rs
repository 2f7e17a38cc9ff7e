// crates/ebd_derive/src/geometry.rs

//! 网格块几何与边界元数据
//!
//! [`Geometry`] 描述问题域的物理范围与均匀网格间距，
//! 用于单元中心坐标（旋转坐标系、径向速度、坐标输出、人造解误差）
//! 和差分分母 `Δx`。未激活轴的坐标恒为 0。

use ebd_foundation::{EbdError, EbdResult, IndexBox, IntVect, SpaceDim, MAX_DIM};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 均匀笛卡尔网格几何
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    domain: IndexBox,
    prob_lo: DVec3,
    prob_hi: DVec3,
    dx: DVec3,
}

impl Geometry {
    /// 创建几何
    ///
    /// # 参数
    /// - `domain`: 问题域的单元索引范围
    /// - `prob_lo`/`prob_hi`: 物理范围（未激活轴被忽略）
    pub fn new(domain: IndexBox, prob_lo: [f64; MAX_DIM], prob_hi: [f64; MAX_DIM]) -> EbdResult<Self> {
        let dim = domain.dim();
        let mut lo = DVec3::ZERO;
        let mut hi = DVec3::ZERO;
        let mut dx = DVec3::ONE;
        for d in 0..dim.count() {
            if !prob_lo[d].is_finite() || !prob_hi[d].is_finite() || prob_hi[d] <= prob_lo[d] {
                return Err(EbdError::invalid_input(format!(
                    "轴 {d} 的物理范围无效: [{}, {}]",
                    prob_lo[d], prob_hi[d]
                )));
            }
            lo[d] = prob_lo[d];
            hi[d] = prob_hi[d];
            dx[d] = (prob_hi[d] - prob_lo[d]) / domain.len(d) as f64;
        }
        Ok(Self {
            domain,
            prob_lo: lo,
            prob_hi: hi,
            dx,
        })
    }

    /// 单位间距几何：`prob_lo = domain.lo`，`dx = 1`
    pub fn unit(domain: IndexBox) -> Self {
        let dim = domain.dim();
        let mut lo = DVec3::ZERO;
        let mut hi = DVec3::ZERO;
        for d in 0..dim.count() {
            lo[d] = domain.lo()[d] as f64;
            hi[d] = (domain.hi()[d] + 1) as f64;
        }
        Self {
            domain,
            prob_lo: lo,
            prob_hi: hi,
            dx: DVec3::ONE,
        }
    }

    /// 空间维度
    #[inline]
    pub fn dim(&self) -> SpaceDim {
        self.domain.dim()
    }

    /// 问题域
    #[inline]
    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    /// 网格间距
    #[inline]
    pub fn dx(&self) -> DVec3 {
        self.dx
    }

    /// 网格间距倒数（未激活轴为 0）
    pub fn inv_dx(&self) -> [f64; MAX_DIM] {
        let mut inv = [0.0; MAX_DIM];
        for (d, v) in inv.iter_mut().enumerate().take(self.dim().count()) {
            *v = 1.0 / self.dx[d];
        }
        inv
    }

    /// 单元中心坐标（未激活轴为 0）
    #[inline]
    pub fn cell_center(&self, iv: IntVect) -> DVec3 {
        let mut x = DVec3::ZERO;
        for d in 0..self.dim().count() {
            x[d] = self.prob_lo[d] + (iv[d] - self.domain.lo()[d]) as f64 * self.dx[d] + 0.5 * self.dx[d];
        }
        x
    }

    /// 问题域中心（未激活轴为 0）
    pub fn domain_center(&self) -> DVec3 {
        0.5 * (self.prob_lo + self.prob_hi)
    }
}

/// 物理边界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BcKind {
    /// 内部 / 周期
    #[default]
    Interior,
    /// 入流
    Inflow,
    /// 出流
    Outflow,
    /// 对称面
    Symmetry,
    /// 滑移壁面
    SlipWall,
    /// 无滑移壁面
    NoSlipWall,
}

/// 单个分量的边界条件记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BcRec {
    /// 各轴低端边界
    pub lo: [BcKind; MAX_DIM],
    /// 各轴高端边界
    pub hi: [BcKind; MAX_DIM],
}

impl BcRec {
    /// 所有边界相同
    pub fn uniform(kind: BcKind) -> Self {
        Self {
            lo: [kind; MAX_DIM],
            hi: [kind; MAX_DIM],
        }
    }
}
