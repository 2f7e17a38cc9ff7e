// crates/ebd_derive/src/exec.rs

//! 逐单元数据并行执行
//!
//! 核函数都是纯逐单元映射：只读输入、每个单元只写一次输出。
//! 这里按 x 行切分输出分量切片，行与行之间互不重叠，
//! 单元数达到阈值时用 rayon 并行处理各行，否则串行。

use ebd_config::ExecConfig;
use ebd_foundation::{DeriveScalar, FieldArray, IndexBox, IntVect};
use rayon::prelude::*;

/// 对 `bx` 内每个单元求值 `f` 并写入 `out` 的第 `comp` 个分量
///
/// 调用方保证 `out` 的索引盒覆盖 `bx`，且 `comp < out.n_comp()`。
pub fn fill_component<S, F>(
    out: &mut FieldArray<S>,
    comp: usize,
    bx: &IndexBox,
    exec: &ExecConfig,
    f: F,
) where
    S: DeriveScalar,
    F: Fn(IntVect) -> S + Sync,
{
    let out_box = *out.index_box();
    debug_assert!(out_box.contains_box(bx));

    let nx = out_box.len(0);
    let (ilo, ihi) = (bx.lo()[0], bx.hi()[0]);
    let ioff = (ilo - out_box.lo()[0]) as usize;

    let fill_row = |row: usize, data: &mut [S]| {
        let (j, k) = out_box.row_jk(row);
        if j < bx.lo()[1] || j > bx.hi()[1] || k < bx.lo()[2] || k > bx.hi()[2] {
            return;
        }
        for (n, i) in (ilo..=ihi).enumerate() {
            data[ioff + n] = f(IntVect::new(i, j, k));
        }
    };

    let slice = out.component_mut(comp);
    if exec.use_parallel(bx.num_cells()) {
        slice
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(row, data)| fill_row(row, data));
    } else {
        slice
            .chunks_mut(nx)
            .enumerate()
            .for_each(|(row, data)| fill_row(row, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebd_foundation::SpaceDim;

    fn index_sum(iv: IntVect) -> f64 {
        (iv[0] + 10 * iv[1] + 100 * iv[2]) as f64
    }

    #[test]
    fn test_fill_sub_box_only() {
        let out_box = IndexBox::from_extent(SpaceDim::Two, [4, 4, 1]).unwrap();
        let bx = IndexBox::new(SpaceDim::Two, IntVect::new(1, 1, 0), IntVect::new(2, 3, 0)).unwrap();
        let mut out = FieldArray::<f64>::filled(out_box, 1, -1.0);

        fill_component(&mut out, 0, &bx, &ExecConfig::serial(), index_sum);

        for iv in out_box.iter() {
            let expected = if bx.contains(iv) { index_sum(iv) } else { -1.0 };
            assert_eq!(out.get(iv, 0), expected);
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let bx = IndexBox::from_extent(SpaceDim::Three, [8, 6, 5]).unwrap();
        let mut serial = FieldArray::<f64>::new(bx, 2);
        let mut parallel = FieldArray::<f64>::new(bx, 2);
        let exec_par = ExecConfig {
            parallel: true,
            parallel_threshold: 1,
            check_finite: false,
        };

        fill_component(&mut serial, 1, &bx, &ExecConfig::serial(), index_sum);
        fill_component(&mut parallel, 1, &bx, &exec_par, index_sum);

        assert_eq!(serial, parallel);
        assert_eq!(parallel.get(IntVect::new(7, 5, 4), 1), 457.0);
        assert_eq!(parallel.get(IntVect::new(7, 5, 4), 0), 0.0);
    }
}
