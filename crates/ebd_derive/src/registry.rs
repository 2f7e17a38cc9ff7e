// crates/ebd_derive/src/registry.rs

//! 派生场注册表
//!
//! 按名称管理派生场：每条记录包含元数据（名称、分量名、单位、说明、
//! 幽灵层需求）与核函数。注册顺序即迭代顺序。
//!
//! # 名称规则
//!
//! 名称必须为 snake_case：仅含 `a-z`、`0-9`、`_`，以字母开头，
//! 不以下划线结尾，不含连续下划线。
//!
//! # 示例
//!
//! ```
//! use ebd_config::DeriveConfig;
//! use ebd_derive::registry::DeriveRegistry;
//! use ebd_foundation::SpaceDim;
//!
//! let registry = DeriveRegistry::<f64>::standard(&DeriveConfig::default(), SpaceDim::Two).unwrap();
//! assert!(registry.contains("magvort"));
//! assert!(registry.contains("x_velocity"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ebd_config::DeriveConfig;
use ebd_foundation::{DeriveScalar, EbdError, FieldArray, SpaceDim};
use serde::{Deserialize, Serialize};

use crate::context::{DeriveContext, DeriveKernel};
use crate::eos::{EquationOfState, GammaLaw};
use crate::error::{DeriveError, DeriveResult};
use crate::kernels::{
    Coordinates, DivU, DivideByRho, Enstrophy, KineticEnergy, LogDensity, MagMom, MagVel, MagVort,
    ManufacturedSolution, MmsError, MmsQuantity, MoleFrac, Placeholder, RadialVelocity, Thermo,
    ThermoQuantity, Velocity,
};
use crate::layout::StateLayout;

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// 验证字段名是否符合 snake_case 规范
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some('a'..='z') => {}
        _ => return false,
    }

    let mut prev = 'a';
    for ch in chars {
        match ch {
            'a'..='z' | '0'..='9' => {}
            '_' if prev != '_' => {}
            _ => return false,
        }
        prev = ch;
    }

    !name.ends_with('_')
}

/// 派生场元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveMeta {
    /// 字段名
    pub name: String,
    /// 各输出分量名（单分量时为字段名本身）
    pub component_names: Vec<String>,
    /// 单位
    pub unit: String,
    /// 说明
    #[serde(default)]
    pub description: String,
    /// 所需状态幽灵层数（注册时由核函数填写）
    #[serde(default)]
    pub n_grow: usize,
}

impl DeriveMeta {
    /// 单分量字段
    pub fn scalar(name: impl Into<String>, unit: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            component_names: vec![name.clone()],
            name,
            unit: unit.into(),
            description: String::new(),
            n_grow: 0,
        }
    }

    /// 多分量字段
    pub fn vector(name: impl Into<String>, unit: impl Into<String>, components: Vec<String>) -> Self {
        Self {
            component_names: components,
            ..Self::scalar(name, unit)
        }
    }

    /// 设置说明
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// 分量数
    pub fn n_comp(&self) -> usize {
        self.component_names.len()
    }
}

/// 注册记录
pub struct DeriveRecord<S: DeriveScalar> {
    meta: DeriveMeta,
    kernel: Arc<dyn DeriveKernel<S>>,
}

impl<S: DeriveScalar> DeriveRecord<S> {
    /// 元数据
    pub fn meta(&self) -> &DeriveMeta {
        &self.meta
    }

    /// 核函数
    pub fn kernel(&self) -> &dyn DeriveKernel<S> {
        self.kernel.as_ref()
    }
}

impl<S: DeriveScalar> Clone for DeriveRecord<S> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            kernel: Arc::clone(&self.kernel),
        }
    }
}

impl<S: DeriveScalar> fmt::Debug for DeriveRecord<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeriveRecord").field("meta", &self.meta).finish_non_exhaustive()
    }
}

/// 派生场注册表
pub struct DeriveRegistry<S: DeriveScalar> {
    records: Vec<DeriveRecord<S>>,
    index: HashMap<String, usize>,
}

impl<S: DeriveScalar> Default for DeriveRegistry<S> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<S: DeriveScalar> Clone for DeriveRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            index: self.index.clone(),
        }
    }
}

impl<S: DeriveScalar> fmt::Debug for DeriveRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<S: DeriveScalar> DeriveRegistry<S> {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 标准派生场注册表
    ///
    /// 按 `config.fields` 过滤（为空时全部注册）。`config.fields` 中
    /// 既非标准字段也非人造解误差字段的名称返回 [`DeriveError::UnknownField`]。
    /// 每个组分另注册 `y_<小写组分名>`，组分名小写后不是合法字段名时返回
    /// [`DeriveError::InvalidName`]。
    /// 启用旋转坐标系且 `dim` 不是三维时返回 [`DeriveError::UnsupportedDimension`]。
    pub fn standard(config: &DeriveConfig, dim: SpaceDim) -> DeriveResult<Self> {
        config.validate()?;
        let layout = StateLayout::from_config(&config.state)?;
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::from_config(&config.eos)?);

        let mut reg = Self::new();

        for (dir, axis) in AXIS_NAMES.iter().enumerate() {
            let name = format!("{axis}_velocity");
            if config.is_enabled(&name) {
                let kernel = Velocity::from_config(dir, &config.rotating_frame, dim)?;
                reg.register(DeriveMeta::scalar(name, "cm/s").with_desc("速度分量"), kernel)?;
            }
        }

        reg.register_if(config, DeriveMeta::scalar("magvel", "cm/s").with_desc("速度模"), MagVel)?;
        reg.register_if(config, DeriveMeta::scalar("magmom", "g/(cm^2 s)").with_desc("动量模"), MagMom)?;
        reg.register_if(config, DeriveMeta::scalar("kineng", "erg/cm^3").with_desc("动能密度"), KineticEnergy)?;
        reg.register_if(config, DeriveMeta::scalar("logden", "-").with_desc("log10 密度"), LogDensity)?;
        reg.register_if(config, DeriveMeta::scalar("radvel", "cm/s").with_desc("径向速度"), RadialVelocity)?;

        let coord_names = AXIS_NAMES[..dim.count()].iter().map(|a| a.to_string()).collect();
        reg.register_if(
            config,
            DeriveMeta::vector("coord", "cm", coord_names).with_desc("单元中心坐标"),
            Coordinates::new(dim),
        )?;

        let species = &config.eos.species_names;
        reg.register_if(
            config,
            DeriveMeta::vector("massfrac", "-", species.iter().map(|s| format!("Y({s})")).collect())
                .with_desc("质量分数"),
            DivideByRho::mass_fractions(&layout),
        )?;
        for (n, s) in species.iter().enumerate() {
            let meta = DeriveMeta::scalar(format!("y_{}", s.to_lowercase()), "-").with_desc("单组分质量分数");
            reg.register_if(config, meta, DivideByRho::species(n, &layout)?)?;
        }

        reg.register_if(config, DeriveMeta::scalar("magvort", "1/s").with_desc("涡量模"), MagVort)?;
        reg.register_if(config, DeriveMeta::scalar("divu", "1/s").with_desc("速度散度"), DivU)?;
        reg.register_if(config, DeriveMeta::scalar("enstrophy", "g/(cm s^2)").with_desc("涡拟能"), Enstrophy)?;

        for q in ThermoQuantity::ALL {
            reg.register_if(config, DeriveMeta::scalar(q.name(), q.unit()), Thermo::new(q, eos.clone()))?;
        }
        reg.register_if(
            config,
            DeriveMeta::vector("molefrac", "-", species.iter().map(|s| format!("X({s})")).collect())
                .with_desc("摩尔分数"),
            MoleFrac::new(eos),
        )?;

        if let Some(unknown) = config.fields.iter().find(|f| {
            !reg.contains(f) && !MmsQuantity::ALL.iter().any(|q| q.name() == f.as_str())
        }) {
            return Err(DeriveError::UnknownField(unknown.clone()));
        }

        log::info!("派生场注册表已构建: {} 个字段 ({})", reg.len(), dim);
        Ok(reg)
    }

    /// 注册人造解误差字段（按 `config.fields` 过滤）
    pub fn register_manufactured_solution(
        &mut self,
        config: &DeriveConfig,
        solution: Arc<dyn ManufacturedSolution>,
    ) -> DeriveResult<()> {
        let eos: Arc<dyn EquationOfState> = Arc::new(GammaLaw::from_config(&config.eos)?);
        for q in MmsQuantity::ALL {
            let unit = match q {
                MmsQuantity::Density => "g/cm^3",
                MmsQuantity::Velocity(_) => "cm/s",
                MmsQuantity::Pressure => "dyn/cm^2",
            };
            let meta = DeriveMeta::scalar(q.name(), unit).with_desc("计算值 - 人造解");
            self.register_if(config, meta, MmsError::new(q, solution.clone(), eos.clone()))?;
        }
        Ok(())
    }

    /// 登记由其他环节填充的字段，派生时不写入输出
    pub fn register_placeholder(&mut self, meta: DeriveMeta) -> DeriveResult<()> {
        let kernel = Placeholder::new(meta.n_comp());
        self.register(meta, kernel)
    }

    /// 注册派生场
    ///
    /// # 验证规则
    /// 1. 字段名必须符合 snake_case 规范
    /// 2. 字段名不能重复
    /// 3. 分量名个数必须等于核函数输出分量数
    pub fn register(&mut self, mut meta: DeriveMeta, kernel: impl DeriveKernel<S> + 'static) -> DeriveResult<()> {
        if !is_valid_field_name(&meta.name) {
            return Err(DeriveError::InvalidName(meta.name));
        }
        if self.index.contains_key(&meta.name) {
            return Err(DeriveError::DuplicateField(meta.name));
        }
        EbdError::check_size("component names", kernel.n_comp(), meta.n_comp())?;

        meta.n_grow = kernel.n_grow();
        self.index.insert(meta.name.clone(), self.records.len());
        self.records.push(DeriveRecord {
            meta,
            kernel: Arc::new(kernel),
        });
        Ok(())
    }

    fn register_if(
        &mut self,
        config: &DeriveConfig,
        meta: DeriveMeta,
        kernel: impl DeriveKernel<S> + 'static,
    ) -> DeriveResult<()> {
        if !config.is_enabled(&meta.name) {
            return Ok(());
        }
        self.register(meta, kernel)
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&DeriveRecord<S>> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// 是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 按注册顺序返回字段名
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.meta.name.as_str())
    }

    /// 按注册顺序迭代记录
    pub fn iter(&self) -> impl Iterator<Item = &DeriveRecord<S>> + '_ {
        self.records.iter()
    }

    /// 字段数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 计算派生场，写入 `out` 的 `[dcomp, dcomp + n_comp)` 分量
    ///
    /// `ctx.exec.check_finite` 开启时，计算后扫描输出，
    /// 发现非有限值返回 [`DeriveError::NonFinite`]。
    pub fn derive(
        &self,
        name: &str,
        ctx: &DeriveContext<'_, S>,
        out: &mut FieldArray<S>,
        dcomp: usize,
    ) -> DeriveResult<()> {
        let record = self
            .get(name)
            .ok_or_else(|| DeriveError::UnknownField(name.to_string()))?;

        log::debug!("derive {} on {} (level {}, t = {})", name, ctx.bx, ctx.level, ctx.time);
        record.kernel.derive(ctx, out, dcomp)?;

        if ctx.exec.check_finite {
            let n_comp = record.kernel.n_comp();
            if let Some((cell, comp, value)) = out.find_non_finite(&ctx.bx, dcomp, n_comp) {
                log::warn!("字段 {} 在单元 {} 分量 {} 处出现非有限值 {}", name, cell, comp, value);
                return Err(DeriveError::NonFinite {
                    field: name.to_string(),
                    cell,
                    comp,
                    value: value.as_f64(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::URHO;
    use crate::test_support::Fixture;
    use ebd_config::{ExecConfig, RotatingFrameConfig};
    use ebd_foundation::IntVect;

    #[test]
    fn test_field_name_validation() {
        assert!(is_valid_field_name("magvort"));
        assert!(is_valid_field_name("x_velocity"));
        assert!(is_valid_field_name("mach_number2"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("Temp"));
        assert!(!is_valid_field_name("_temp"));
        assert!(!is_valid_field_name("temp_"));
        assert!(!is_valid_field_name("temp__value"));
        assert!(!is_valid_field_name("temp-value"));
        assert!(!is_valid_field_name("2temp"));
    }

    #[test]
    fn test_standard_registry() {
        let reg = DeriveRegistry::<f64>::standard(&DeriveConfig::default(), SpaceDim::Three).unwrap();
        let names: Vec<&str> = reg.names().collect();
        assert_eq!(&names[..3], ["x_velocity", "y_velocity", "z_velocity"]);
        for name in ["magvort", "divu", "enstrophy", "massfrac", "molefrac", "temp", "mach_number"] {
            assert!(reg.contains(name), "missing {name}");
        }
        assert!(!reg.contains("rhommserror"));
        assert_eq!(reg.get("magvort").unwrap().meta().n_grow, 1);
        assert_eq!(reg.get("coord").unwrap().meta().n_comp(), 3);
        assert_eq!(reg.get("massfrac").unwrap().meta().component_names, ["Y(air)"]);
        assert_eq!(reg.get("y_air").unwrap().meta().n_comp(), 1);
    }

    #[test]
    fn test_species_fields_per_species() {
        let mut config = DeriveConfig::default();
        config.state.n_species = 2;
        config.eos.mol_weights = vec![28.0, 32.0];
        config.eos.species_names = vec!["N2".into(), "O2".into()];
        let reg = DeriveRegistry::<f64>::standard(&config, SpaceDim::One).unwrap();

        let layout = StateLayout::new(2).unwrap();
        let mut fx = Fixture::new(SpaceDim::One, [2, 1, 1], 0, layout);
        for iv in fx.bx.iter().collect::<Vec<_>>() {
            fx.state.set(iv, URHO, 2.0);
            fx.state.set(iv, layout.species(0), 1.5);
            fx.state.set(iv, layout.species(1), 0.5);
        }
        let mut out = FieldArray::new(fx.bx, 2);
        reg.derive("y_n2", &fx.ctx(), &mut out, 0).unwrap();
        reg.derive("y_o2", &fx.ctx(), &mut out, 1).unwrap();
        let iv = IntVect::new(1, 0, 0);
        assert_eq!((out.get(iv, 0), out.get(iv, 1)), (0.75, 0.25));
    }

    #[test]
    fn test_placeholder_field() {
        let mut reg = DeriveRegistry::<f64>::new();
        reg.register_placeholder(DeriveMeta::scalar("tracer", "-")).unwrap();
        assert_eq!(reg.get("tracer").unwrap().meta().n_comp(), 1);

        let fx = Fixture::new(SpaceDim::One, [2, 1, 1], 0, StateLayout::default());
        let mut out = FieldArray::filled(fx.bx, 1, 3.0);
        reg.derive("tracer", &fx.ctx(), &mut out, 0).unwrap();
        assert!(fx.bx.iter().all(|iv| out.get(iv, 0) == 3.0));
    }

    #[test]
    fn test_field_filter() {
        let config = DeriveConfig {
            fields: vec!["divu".to_string(), "pmmserror".to_string()],
            ..Default::default()
        };
        let reg = DeriveRegistry::<f64>::standard(&config, SpaceDim::Two).unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), ["divu"]);

        let bad = DeriveConfig {
            fields: vec!["vorticity".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            DeriveRegistry::<f64>::standard(&bad, SpaceDim::Two),
            Err(DeriveError::UnknownField(name)) if name == "vorticity"
        ));
    }

    #[test]
    fn test_rotating_frame_rejected_in_2d() {
        let config = DeriveConfig {
            rotating_frame: RotatingFrameConfig::new(2, 1.0, [0.0; 3]),
            ..Default::default()
        };
        assert!(matches!(
            DeriveRegistry::<f64>::standard(&config, SpaceDim::Two),
            Err(DeriveError::UnsupportedDimension { .. })
        ));
        assert!(DeriveRegistry::<f64>::standard(&config, SpaceDim::Three).is_ok());
    }

    #[test]
    fn test_register_rejects_invalid_and_duplicate() {
        let mut reg = DeriveRegistry::<f64>::new();
        assert!(reg.register(DeriveMeta::scalar("magvel", "cm/s"), MagVel).is_ok());
        assert!(matches!(
            reg.register(DeriveMeta::scalar("magvel", "cm/s"), MagVel),
            Err(DeriveError::DuplicateField(_))
        ));
        assert!(matches!(
            reg.register(DeriveMeta::scalar("MagVel", "cm/s"), MagVel),
            Err(DeriveError::InvalidName(_))
        ));
        assert!(reg
            .register(DeriveMeta::scalar("coord", "cm"), Coordinates::new(SpaceDim::Two))
            .is_err());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_derive_dispatch_and_unknown() {
        let reg = DeriveRegistry::<f64>::standard(&DeriveConfig::default(), SpaceDim::One).unwrap();
        let fx = Fixture::new(SpaceDim::One, [4, 1, 1], 1, StateLayout::default());
        let mut out = FieldArray::new(fx.bx, 2);

        reg.derive("logden", &fx.ctx(), &mut out, 1).unwrap();
        assert_eq!(out.get(IntVect::new(3, 0, 0), 1), 0.0);
        assert!(matches!(
            reg.derive("nope", &fx.ctx(), &mut out, 0),
            Err(DeriveError::UnknownField(_))
        ));
        assert!(matches!(
            reg.derive("logden", &fx.ctx(), &mut out, 2),
            Err(DeriveError::ComponentRange { .. })
        ));
    }

    #[test]
    fn test_check_finite_reports_cell() {
        let reg = DeriveRegistry::<f64>::standard(&DeriveConfig::default(), SpaceDim::One).unwrap();
        let mut fx = Fixture::new(SpaceDim::One, [4, 1, 1], 0, StateLayout::default());
        fx.state.set(IntVect::new(2, 0, 0), URHO, 0.0);
        let mut out = FieldArray::new(fx.bx, 1);

        // 默认不检查：非正密度原样传播
        reg.derive("kineng", &fx.ctx(), &mut out, 0).unwrap();
        assert!(out.get(IntVect::new(2, 0, 0), 0).is_nan());

        fx.exec = ExecConfig::serial().with_check_finite(true);
        let err = reg.derive("kineng", &fx.ctx(), &mut out, 0).unwrap_err();
        assert!(matches!(
            err,
            DeriveError::NonFinite { cell, comp: 0, .. } if cell == IntVect::new(2, 0, 0)
        ));
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DeriveRegistry<f64>>();
        assert_send_sync::<DeriveRegistry<f32>>();
    }
}
