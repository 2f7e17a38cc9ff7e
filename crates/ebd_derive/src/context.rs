// crates/ebd_derive/src/context.rs

//! 派生场核函数统一接口
//!
//! 所有派生场（差分类、逐点代数类、状态方程类、人造解误差类）
//! 共享同一签名：输入上下文 + 输出数组 + 输出起始分量，
//! 因而可以统一注册和分派。

use ebd_config::ExecConfig;
use ebd_foundation::{DeriveScalar, FieldArray, IndexBox, IntVect};

use crate::eb::EbFlagArray;
use crate::error::{DeriveError, DeriveResult};
use crate::geometry::{BcRec, Geometry};
use crate::layout::StateLayout;
use crate::stencil::Connectivity;

/// 单次核函数调用的只读输入
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a, S: DeriveScalar> {
    /// 待计算区域
    pub bx: IndexBox,
    /// 守恒状态（需覆盖 `bx` 外扩 `n_grow` 层）
    pub state: &'a FieldArray<S>,
    /// 状态分量布局
    pub layout: &'a StateLayout,
    /// 网格几何
    pub geom: &'a Geometry,
    /// 嵌入边界标志（无几何时为 `None`）
    pub eb_flags: Option<&'a EbFlagArray>,
    /// 物理时间
    pub time: f64,
    /// 加密层级
    pub level: usize,
    /// 各分量边界条件
    pub bcrec: &'a [BcRec],
    /// 执行策略
    pub exec: &'a ExecConfig,
}

impl<'a, S: DeriveScalar> DeriveContext<'a, S> {
    /// 以最常用的参数创建上下文（无嵌入边界、t = 0、第 0 层）
    pub fn new(
        bx: IndexBox,
        state: &'a FieldArray<S>,
        layout: &'a StateLayout,
        geom: &'a Geometry,
        exec: &'a ExecConfig,
    ) -> Self {
        Self {
            bx,
            state,
            layout,
            geom,
            eb_flags: None,
            time: 0.0,
            level: 0,
            bcrec: &[],
            exec,
        }
    }

    /// 设置嵌入边界标志
    pub fn with_eb_flags(mut self, flags: &'a EbFlagArray) -> Self {
        self.eb_flags = Some(flags);
        self
    }

    /// 设置时间
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// 设置层级
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// 设置边界条件
    pub fn with_bcrec(mut self, bcrec: &'a [BcRec]) -> Self {
        self.bcrec = bcrec;
        self
    }

    /// 连通性分派
    #[inline]
    pub fn connectivity(&self) -> Connectivity<'a> {
        Connectivity::from_flags(self.eb_flags)
    }

    /// 读取状态分量
    #[inline]
    pub fn state_at(&self, iv: IntVect, comp: usize) -> S {
        self.state.get(iv, comp)
    }

    /// 调用前检查：索引盒覆盖、分量区间与布局一致性
    pub fn validate(&self, n_grow: usize, out: &FieldArray<S>, dcomp: usize, n_comp: usize) -> DeriveResult<()> {
        if self.bx.dim() != self.geom.dim() {
            return Err(DeriveError::DimensionMismatch {
                what: "box",
                expected: self.geom.dim(),
                have: self.bx.dim(),
            });
        }
        DeriveError::check_covers("output", out.index_box(), &self.bx)?;
        DeriveError::check_covers("state", self.state.index_box(), &self.bx.grow(n_grow as i32))?;
        if let Some(flags) = self.eb_flags {
            DeriveError::check_covers("eb flags", flags.index_box(), &self.bx)?;
        }
        DeriveError::check_components("output", dcomp, n_comp, out.n_comp())?;
        self.layout.check_state(self.state.n_comp())?;
        Ok(())
    }
}

/// 派生场核函数
///
/// 实现者只负责逐单元计算；覆盖范围与分量区间由 [`DeriveContext::validate`]
/// 在任何逐单元工作之前统一检查。
pub trait DeriveKernel<S: DeriveScalar>: Send + Sync {
    /// 输出分量数
    fn n_comp(&self) -> usize;

    /// 需要的状态幽灵层数
    fn n_grow(&self) -> usize {
        0
    }

    /// 与调用上下文相关的额外检查（如维度限制）
    fn check(&self, _ctx: &DeriveContext<'_, S>) -> DeriveResult<()> {
        Ok(())
    }

    /// 计算 `ctx.bx` 内的派生场，写入 `out` 的 `[dcomp, dcomp + n_comp)` 分量
    fn compute(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize);

    /// 检查后计算
    fn derive(&self, ctx: &DeriveContext<'_, S>, out: &mut FieldArray<S>, dcomp: usize) -> DeriveResult<()> {
        ctx.validate(self.n_grow(), out, dcomp, self.n_comp())?;
        self.check(ctx)?;
        self.compute(ctx, out, dcomp);
        Ok(())
    }
}
