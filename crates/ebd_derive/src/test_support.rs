// crates/ebd_derive/src/test_support.rs

//! 单元测试夹具

use ebd_config::ExecConfig;
use ebd_foundation::{FieldArray, IndexBox, SpaceDim};

use crate::context::{DeriveContext, DeriveKernel};
use crate::eb::EbFlagArray;
use crate::error::DeriveResult;
use crate::geometry::Geometry;
use crate::layout::{StateLayout, URHO};

/// 单位间距网格块 + 静止均匀状态（ρ = 1，其余为 0）
pub(crate) struct Fixture {
    pub bx: IndexBox,
    pub state: FieldArray<f64>,
    pub layout: StateLayout,
    pub geom: Geometry,
    pub exec: ExecConfig,
    pub flags: Option<EbFlagArray>,
}

impl Fixture {
    pub fn new(dim: SpaceDim, extent: [usize; 3], n_grow: i32, layout: StateLayout) -> Self {
        let bx = IndexBox::from_extent(dim, extent).unwrap();
        let state = FieldArray::from_fn(bx.grow(n_grow), layout.n_var(), |_, comp| {
            if comp == URHO {
                1.0
            } else {
                0.0
            }
        });
        Self {
            bx,
            state,
            layout,
            geom: Geometry::unit(bx),
            exec: ExecConfig::serial(),
            flags: None,
        }
    }

    pub fn ctx(&self) -> DeriveContext<'_, f64> {
        let ctx = DeriveContext::new(self.bx, &self.state, &self.layout, &self.geom, &self.exec);
        match &self.flags {
            Some(flags) => ctx.with_eb_flags(flags),
            None => ctx,
        }
    }

    pub fn run(&self, kernel: &dyn DeriveKernel<f64>) -> DeriveResult<FieldArray<f64>> {
        let mut out = FieldArray::new(self.bx, kernel.n_comp());
        kernel.derive(&self.ctx(), &mut out, 0)?;
        Ok(out)
    }
}
