// crates/ebd_derive/src/kernels/velocity.rs

//! 速度类派生场
//!
//! # 旋转坐标系
//!
//! 启用时速度分量叠加刚体旋转修正：
//!
//! ```text
//! u_d = m_d / ρ + (Ω × r)_d
//! Ω   = omega · e_axis
//! r   = x_cell - axis_loc
//! ```
//!
//! 叉积只在三维中有定义，低维启用旋转坐标系是配置错误，
//! 在构建核函数时报告，调用时若几何不是三维再报告一次。

use ebd_config::RotatingFrameConfig;
use ebd_foundation::{DeriveScalar, EbdError, FieldArray, SpaceDim};
use glam::DVec3;

use super::velocity_at;
use crate::context::{DeriveContext, DeriveKernel};
use crate::error::{DeriveError, DeriveResult};
use crate::exec::fill_component;

/// 已验证的旋转坐标系参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingFrame {
    omega: DVec3,
    axis_loc: DVec3,
}

impl RotatingFrame {
    /// 由配置构建
    ///
    /// 未启用时返回 `Ok(None)`；启用且 `dim` 不是三维时返回
    /// [`DeriveError::UnsupportedDimension`]。
    pub fn from_config(config: &RotatingFrameConfig, dim: SpaceDim) -> DeriveResult<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        config.validate()?;
        if dim != SpaceDim::Three {
            return Err(DeriveError::UnsupportedDimension {
                feature: "rotating frame",
                dim,
            });
        }
        if config.omega == 0.0 {
            log::warn!("旋转坐标系已启用但角速度为 0，修正项恒为零");
        }

        let mut omega = DVec3::ZERO;
        omega[config.axis] = config.omega;
        Ok(Some(Self {
            omega,
            axis_loc: DVec3::from_array(config.axis_loc),
        }))
    }

    /// 角速度矢量
    pub fn omega(&self) -> DVec3 {
        self.omega
    }

    /// 位置 `x` 处的牵连速度 `Ω × (x - axis_loc)`
    #[inline]
    pub fn frame_velocity(&self, x: DVec3) -> DVec3 {
        self.omega.cross(x - self.axis_loc)
    }
}

/// 速度分量 `x_velocity` / `y_velocity` / `z_velocity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    dir: usize,
    frame: Option<RotatingFrame>,
}

impl Velocity {
    /// 惯性系速度分量，`dir >= 3` 返回错误
    pub fn new(dir: usize) -> DeriveResult<Self> {
        EbdError::check_index("velocity direction", dir, 3)?;
        Ok(Self { dir, frame: None })
    }

    /// 按配置构建（可能启用旋转坐标系）
    pub fn from_config(dir: usize, config: &RotatingFrameConfig, dim: SpaceDim) -> DeriveResult<Self> {
        Ok(Self {
            frame: RotatingFrame::from_config(config, dim)?,
            ..Self::new(dir)?
        })
    }

    /// 速度方向
    pub fn dir(&self) -> usize {
        self.dir
    }

    /// 是否叠加旋转修正
    pub fn is_rotating(&self) -> bool {
        self.frame.is_some()
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for Velocity {
    fn n_comp(&self) -> usize {
        1
    }

    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        let dim = ctx.geom.dim();
        if self.frame.is_some() && dim != SpaceDim::Three {
            return Err(DeriveError::UnsupportedDimension {
                feature: "rotating frame",
                dim,
            });
        }
        Ok(())
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let dir = self.dir;
        match self.frame {
            None => fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| velocity_at(ctx, iv, dir)),
            Some(frame) => fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
                let w = frame.frame_velocity(ctx.geom.cell_center(iv));
                velocity_at(ctx, iv, dir) + S::from_config(w[dir])
            }),
        }
    }
}

/// 径向速度 `u · r̂`，`r` 自问题域中心量起
///
/// 只计入激活轴；恰在中心处输出 0。
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialVelocity;

impl<S: DeriveScalar> DeriveKernel<S> for RadialVelocity {
    fn n_comp(&self) -> usize {
        1
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        let center = ctx.geom.domain_center();
        let ndim = ctx.geom.dim().count();
        fill_component(out, dcomp, &ctx.bx, ctx.exec, |iv| {
            let r = ctx.geom.cell_center(iv) - center;
            let len = r.length();
            if len == 0.0 {
                return S::ZERO;
            }
            let mut ur = S::ZERO;
            for d in 0..ndim {
                ur += velocity_at(ctx, iv, d) * S::from_config(r[d] / len);
            }
            ur
        });
    }
}

/// 单元中心坐标，每个激活轴一个分量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    dim: SpaceDim,
}

impl Coordinates {
    /// 创建
    pub fn new(dim: SpaceDim) -> Self {
        Self { dim }
    }
}

impl<S: DeriveScalar> DeriveKernel<S> for Coordinates {
    fn n_comp(&self) -> usize {
        self.dim.count()
    }

    fn check(&self, ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        if ctx.geom.dim() != self.dim {
            return Err(DeriveError::DimensionMismatch {
                what: "coord",
                expected: ctx.geom.dim(),
                have: self.dim,
            });
        }
        Ok(())
    }

    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) {
        for d in 0..self.dim.count() {
            fill_component(out, dcomp + d, &ctx.bx, ctx.exec, |iv| {
                S::from_config(ctx.geom.cell_center(iv)[d])
            });
        }
    }
}
