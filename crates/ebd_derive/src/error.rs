// crates/ebd_derive/src/error.rs

//! 派生场错误类型
//!
//! 所有配置级错误（维度不匹配、分量越界、索引盒覆盖不足）
//! 都在逐单元计算开始之前一次性检查并返回，核函数本身不会中途失败。
//! 退化模板（被覆盖单元、两侧都不连通的单元）不是错误。

use ebd_config::ConfigError;
use ebd_foundation::{EbdError, IndexBox, IntVect, SpaceDim};
use thiserror::Error;

/// 派生场结果类型
pub type DeriveResult<T> = Result<T, DeriveError>;

/// 派生场错误
#[derive(Debug, Error)]
pub enum DeriveError {
    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] EbdError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 在不支持的空间维度上请求某项功能
    #[error("{feature} 需要 3D，当前为 {dim}")]
    UnsupportedDimension {
        /// 功能名称
        feature: &'static str,
        /// 当前维度
        dim: SpaceDim,
    },

    /// 分量区间超出数组分量数
    #[error("{what}: 分量区间 [{start}, {start}+{count}) 超出分量数 {n_comp}")]
    ComponentRange {
        /// 数组描述
        what: &'static str,
        /// 起始分量
        start: usize,
        /// 分量个数
        count: usize,
        /// 数组分量数
        n_comp: usize,
    },

    /// 索引盒覆盖不足
    #[error("{what} 的索引盒 {have} 未覆盖所需区域 {need}")]
    BoxNotCovered {
        /// 数组描述
        what: &'static str,
        /// 所需区域
        need: IndexBox,
        /// 实际区域
        have: IndexBox,
    },

    /// 维度不一致
    #[error("{what} 的维度 {have} 与几何维度 {expected} 不一致")]
    DimensionMismatch {
        /// 数组描述
        what: &'static str,
        /// 几何维度
        expected: SpaceDim,
        /// 实际维度
        have: SpaceDim,
    },

    /// 输出中出现非有限值（通常源于非正密度）
    #[error("字段 {field} 在单元 {cell} 分量 {comp} 处出现非有限值 {value}")]
    NonFinite {
        /// 字段名
        field: String,
        /// 单元索引
        cell: IntVect,
        /// 分量
        comp: usize,
        /// 数值
        value: f64,
    },

    /// 非法字段名（非 snake_case）
    #[error("非法字段名 '{0}': 必须为 snake_case (a-z, 0-9, _)")]
    InvalidName(String),

    /// 字段重复注册
    #[error("字段 '{0}' 已注册")]
    DuplicateField(String),

    /// 字段未注册
    #[error("未知字段 '{0}'")]
    UnknownField(String),
}

impl DeriveError {
    /// 检查分量区间
    pub fn check_components(
        what: &'static str,
        start: usize,
        count: usize,
        n_comp: usize,
    ) -> DeriveResult<()> {
        if start + count > n_comp {
            return Err(Self::ComponentRange {
                what,
                start,
                count,
                n_comp,
            });
        }
        Ok(())
    }

    /// 检查索引盒覆盖
    pub fn check_covers(what: &'static str, have: &IndexBox, need: &IndexBox) -> DeriveResult<()> {
        if have.dim() != need.dim() {
            return Err(Self::DimensionMismatch {
                what,
                expected: need.dim(),
                have: have.dim(),
            });
        }
        if !have.contains_box(need) {
            return Err(Self::BoxNotCovered {
                what,
                need: *need,
                have: *have,
            });
        }
        Ok(())
    }
}
