// crates/ebd_derive/src/kernels/gradient.rs

//! 基于差分模板的速度梯度类派生场
//!
//! 每个目标单元、每个激活方向独立选取模板：
//!
//! ```text
//! ∂u_c/∂x_d ≈ w · (u_c(ip) - u_c(im)) / Δx_d,   u_c = m_c / ρ
//! ```
//!
//! 未激活轴的导数为 0，不访问该轴上的邻居。
//! 被覆盖单元的输出恒为 0；孤立流体单元所有导数为 0，输出有限。
//! 三个核函数都需要 1 层状态幽灵单元。

use ebd_foundation::{DeriveScalar, FieldArray, IntVect};

use super::{magnitude_sq, velocity_at};
use crate::context::{DeriveContext, DeriveKernel};
use crate::exec::fill_component;
use crate::layout::URHO;
use crate::stencil::Connectivity;

/// 速度梯度张量 `g[c][d] = ∂u_c/∂x_d`
type VelGrad<S> = [[S; 3]; 3];

/// 速度梯度算子
///
/// 持有单次调用中不变的量：连通性分派、间距倒数与激活维数。
struct VelocityGradient<'c, 'a, S: DeriveScalar> {
    ctx: &'c DeriveContext<'a, S>,
    conn: Connectivity<'a>,
    inv_dx: [S; 3],
    ndim: usize,
}

impl<'c, 'a, S: DeriveScalar> VelocityGradient<'c, 'a, S> {
    fn new(ctx: &'c DeriveContext<'a, S>) -> Self {
        let inv = ctx.geom.inv_dx();
        Self {
            ctx,
            conn: ctx.connectivity(),
            inv_dx: [
                S::from_config(inv[0]),
                S::from_config(inv[1]),
                S::from_config(inv[2]),
            ],
            ndim: ctx.geom.dim().count(),
        }
    }

    #[inline]
    fn is_covered(&self, iv: IntVect) -> bool {
        self.conn.is_covered(iv)
    }

    fn at(&self, iv: IntVect) -> VelGrad<S> {
        let mut g = [[S::ZERO; 3]; 3];
        for d in 0..self.ndim {
            let st = self.conn.stencil(iv, d);
            for (c, row) in g.iter_mut().enumerate() {
                row[d] = st.derivative(self.inv_dx[d], |jv| velocity_at(self.ctx, jv, c));
            }
        }
        g
    }
}

#[inline]
fn vorticity<S: DeriveScalar>(g: &VelGrad<S>) -> [S; 3] {
    [
        g[2][1] - g[1][2],
        g[0][2] - g[2][0],
        g[1][0] - g[0][1],
    ]
}

/// 涡量模 `|∇ × u|`
#[derive(Debug, Clone, Copy, Default)]
pub struct MagVort;

impl<S: DeriveScalar> DeriveKernel<S> for MagVort {
    fn n_comp(&self) -> usize {
        1
    }

    fn n_grow(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let grad = VelocityGradient::new(ctx);
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            if grad.is_covered(iv) {
                return S::ZERO;
            }
            magnitude_sq(vorticity(&grad.at(iv))).sqrt()
        });
    }
}

/// 速度散度 `∇ · u`
#[derive(Debug, Clone, Copy, Default)]
pub struct DivU;

impl<S: DeriveScalar> DeriveKernel<S> for DivU {
    fn n_comp(&self) -> usize {
        1
    }

    fn n_grow(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let grad = VelocityGradient::new(ctx);
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            if grad.is_covered(iv) {
                return S::ZERO;
            }
            // 只对激活轴的对角元素求和
            let g = grad.at(iv);
            (0..grad.ndim).map(|d| g[d][d]).sum()
        });
    }
}

/// 涡拟能 `0.5 ρ |ω|²`
#[derive(Debug, Clone, Copy, Default)]
pub struct Enstrophy;

impl<S: DeriveScalar> DeriveKernel<S> for Enstrophy {
    fn n_comp(&self) -> usize {
        1
    }

    fn n_grow(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let grad = VelocityGradient::new(ctx);
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            if grad.is_covered(iv) {
                return S::ZERO;
            }
            S::HALF * ctx.state_at(iv, URHO) * magnitude_sq(vorticity(&grad.at(iv)))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eb::EbFlagArray;
    use crate::error::DeriveError;
    use crate::layout::{StateLayout, UMX, UMY};
    use crate::test_support::Fixture;
    use ebd_foundation::SpaceDim;

    /// 在包括幽灵层在内的整个状态数组上设置速度场（ρ = 1）
    fn set_velocity(fx: &mut Fixture, u: impl Fn(f64, f64) -> (f64, f64)) {
        let cells: Vec<IntVect> = fx.state.index_box().iter().collect();
        for iv in cells {
            let (x, y) = (iv[0] as f64, iv[1] as f64);
            let (ux, uy) = u(x, y);
            fx.state.set(iv, UMX, ux);
            fx.state.set(iv, UMY, uy);
        }
    }

    #[test]
    fn test_solid_body_rotation_2d() {
        let mut fx = Fixture::new(SpaceDim::Two, [4, 4, 1], 1, StateLayout::default());
        set_velocity(&mut fx, |x, y| (-y, x));

        let vort = fx.run(&MagVort).unwrap();
        let div = fx.run(&DivU).unwrap();
        let ens = fx.run(&Enstrophy).unwrap();
        for iv in fx.bx.iter() {
            assert!((vort.get(iv, 0) - 2.0).abs() < 1e-12);
            assert!(div.get(iv, 0).abs() < 1e-12);
            assert!((ens.get(iv, 0) - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_divergence_of_expansion() {
        let mut fx = Fixture::new(SpaceDim::Two, [3, 3, 1], 1, StateLayout::default());
        set_velocity(&mut fx, |x, y| (x, y));
        let div = fx.run(&DivU).unwrap();
        for iv in fx.bx.iter() {
            assert!((div.get(iv, 0) - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_covered_and_cut_cells() {
        // 1D, u = 3x, 单元 4 被覆盖
        let mut fx = Fixture::new(SpaceDim::One, [5, 1, 1], 1, StateLayout::default());
        set_velocity(&mut fx, |x, _| (3.0 * x, 0.0));
        fx.flags = Some(EbFlagArray::from_covered_mask(fx.bx, |iv| iv[0] == 4));

        let div = fx.run(&DivU).unwrap();
        assert_eq!(div.get(IntVect::new(4, 0, 0), 0), 0.0);
        // 切割单元 3 使用单侧差分，线性场仍然精确
        assert!((div.get(IntVect::new(3, 0, 0), 0) - 3.0).abs() < 1e-12);
        assert!((div.get(IntVect::new(2, 0, 0), 0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_covered_cell_with_nan_state_is_zero() {
        let mut fx = Fixture::new(SpaceDim::One, [3, 1, 1], 1, StateLayout::default());
        fx.state.set(IntVect::new(1, 0, 0), URHO, f64::NAN);
        fx.flags = Some(EbFlagArray::from_covered_mask(fx.bx, |iv| iv[0] == 1));

        let vort = fx.run(&MagVort).unwrap();
        let ens = fx.run(&Enstrophy).unwrap();
        for i in 0..3 {
            let iv = IntVect::new(i, 0, 0);
            assert_eq!(vort.get(iv, 0), 0.0);
            assert_eq!(ens.get(iv, 0), 0.0);
        }
    }

    #[test]
    fn test_requires_ghost_cells() {
        let fx = Fixture::new(SpaceDim::Two, [3, 3, 1], 0, StateLayout::default());
        assert!(matches!(
            fx.run(&MagVort),
            Err(DeriveError::BoxNotCovered { .. })
        ));
    }
}
