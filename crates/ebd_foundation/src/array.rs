// crates/ebd_foundation/src/array.rs

//! 多分量稠密场数组
//!
//! [`FieldArray`] 在一个索引盒上为每个单元存储固定数量的分量，
//! 以 `(IntVect, component)` 寻址。存储布局为分量优先（SoA）：
//! 每个分量是一段列主序的连续切片。
//!
//! 输入状态通过 `&FieldArray` 只读访问，输出场通过 `&mut FieldArray` 写入，
//! 借用规则保证二者不会别名。

use crate::error::{EbdError, EbdResult};
use crate::index::{IndexBox, IntVect};
use crate::scalar::DeriveScalar;

/// 多分量稠密场数组
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray<S: DeriveScalar> {
    bx: IndexBox,
    n_comp: usize,
    data: Vec<S>,
}

impl<S: DeriveScalar> FieldArray<S> {
    /// 创建全零数组
    pub fn new(bx: IndexBox, n_comp: usize) -> Self {
        Self::filled(bx, n_comp, S::ZERO)
    }

    /// 创建填充常数的数组
    pub fn filled(bx: IndexBox, n_comp: usize, value: S) -> Self {
        Self {
            bx,
            n_comp,
            data: vec![value; bx.num_cells() * n_comp],
        }
    }

    /// 由逐单元函数构造
    pub fn from_fn(bx: IndexBox, n_comp: usize, f: impl Fn(IntVect, usize) -> S) -> Self {
        let mut arr = Self::new(bx, n_comp);
        for n in 0..n_comp {
            for iv in bx.iter() {
                arr.set(iv, n, f(iv, n));
            }
        }
        arr
    }

    /// 由已有数据构造（分量优先布局）
    pub fn from_vec(bx: IndexBox, n_comp: usize, data: Vec<S>) -> EbdResult<Self> {
        EbdError::check_size("field_array", bx.num_cells() * n_comp, data.len())?;
        Ok(Self { bx, n_comp, data })
    }

    /// 数组所在索引盒
    #[inline]
    pub fn index_box(&self) -> &IndexBox {
        &self.bx
    }

    /// 分量数
    #[inline]
    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    /// 读取单元分量
    #[inline]
    pub fn get(&self, iv: IntVect, comp: usize) -> S {
        debug_assert!(comp < self.n_comp);
        self.data[comp * self.bx.num_cells() + self.bx.offset(iv)]
    }

    /// 写入单元分量
    #[inline]
    pub fn set(&mut self, iv: IntVect, comp: usize, value: S) {
        debug_assert!(comp < self.n_comp);
        let idx = comp * self.bx.num_cells() + self.bx.offset(iv);
        self.data[idx] = value;
    }

    /// 分量只读切片
    #[inline]
    pub fn component(&self, comp: usize) -> &[S] {
        let n = self.bx.num_cells();
        &self.data[comp * n..(comp + 1) * n]
    }

    /// 分量可变切片
    #[inline]
    pub fn component_mut(&mut self, comp: usize) -> &mut [S] {
        let n = self.bx.num_cells();
        &mut self.data[comp * n..(comp + 1) * n]
    }

    /// 检查 `[start, start + count)` 是否是合法分量范围
    pub fn check_components(&self, start: usize, count: usize) -> EbdResult<()> {
        if start + count > self.n_comp {
            return Err(EbdError::index_out_of_bounds(
                "component",
                start + count - 1,
                self.n_comp,
            ));
        }
        Ok(())
    }

    /// 查找 `bx` 内、分量 `[start, start + count)` 中第一个非有限值
    pub fn find_non_finite(
        &self,
        bx: &IndexBox,
        start: usize,
        count: usize,
    ) -> Option<(IntVect, usize, S)> {
        (start..start + count).find_map(|n| {
            bx.iter().find_map(|iv| {
                let v = self.get(iv, n);
                (!v.is_safe()).then_some((iv, n, v))
            })
        })
    }
}
