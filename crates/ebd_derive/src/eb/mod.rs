// crates/ebd_derive/src/eb/mod.rs

//! 嵌入边界单元连通性模型
//!
//! - [`EbCellFlag`]: 单元类型（规则 / 切割 / 被覆盖）与邻居连通位
//! - [`EbFlagArray`]: 网格块上的标志数组与全局规则性汇总

mod flag;
mod flag_array;

pub use flag::EbCellFlag;
pub use flag_array::{EbFlagArray, FabType};
