// crates/ebd_config/src/derive_config.rs

//! DeriveConfig - 派生场配置（全 f64）
//!
//! 汇总派生场计算需要的全部外部参数，以 JSON 存储。
//! 所有字段都有默认值，配置文件只需写出需要覆盖的部分。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::rotating_frame::RotatingFrameConfig;

/// 单个网格块允许的最大组分数
pub const MAX_SPECIES: usize = 32;

/// 派生场配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DeriveConfig {
    /// 旋转坐标系参数
    #[serde(default)]
    pub rotating_frame: RotatingFrameConfig,

    /// 执行策略
    #[serde(default)]
    pub exec: ExecConfig,

    /// 守恒状态布局
    #[serde(default)]
    pub state: StateConfig,

    /// 状态方程参数
    #[serde(default)]
    pub eos: EosConfig,

    /// 启用的派生场名称（为空表示全部启用）
    #[serde(default)]
    pub fields: Vec<String>,
}

/// 执行策略配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecConfig {
    /// 是否启用并行
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// 并行阈值（单元数）
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// 计算后检查输出是否全部有限
    #[serde(default)]
    pub check_finite: bool,
}

fn default_parallel() -> bool { true }
fn default_parallel_threshold() -> usize { 4096 }

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            parallel_threshold: default_parallel_threshold(),
            check_finite: false,
        }
    }
}

impl ExecConfig {
    /// 串行执行
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// 设置输出有限性检查
    pub fn with_check_finite(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// 给定单元数时是否走并行路径
    #[inline]
    pub fn use_parallel(&self, n_cells: usize) -> bool {
        self.parallel && n_cells >= self.parallel_threshold
    }
}

/// 守恒状态布局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// 组分数
    #[serde(default = "default_n_species")]
    pub n_species: usize,
}

fn default_n_species() -> usize { 1 }

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            n_species: default_n_species(),
        }
    }
}

/// 状态方程配置（理想气体 gamma 律）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EosConfig {
    /// 比热比
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// 各组分摩尔质量 [g/mol]
    #[serde(default = "default_mol_weights")]
    pub mol_weights: Vec<f64>,

    /// 各组分名称
    #[serde(default = "default_species_names")]
    pub species_names: Vec<String>,
}

fn default_gamma() -> f64 { 1.4 }
fn default_mol_weights() -> Vec<f64> { vec![28.97] }
fn default_species_names() -> Vec<String> { vec!["air".to_string()] }

impl Default for EosConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            mol_weights: default_mol_weights(),
            species_names: default_species_names(),
        }
    }
}

impl EosConfig {
    /// 单组分理想气体
    pub fn single(gamma: f64, mol_weight: f64) -> Self {
        Self {
            gamma,
            mol_weights: vec![mol_weight],
            species_names: default_species_names(),
        }
    }
}

impl DeriveConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let config: DeriveConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 字段是否启用
    pub fn is_enabled(&self, name: &str) -> bool {
        self.fields.is_empty() || self.fields.iter().any(|f| f == name)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rotating_frame.validate()?;

        if self.exec.parallel_threshold == 0 {
            return Err(ConfigError::invalid(
                "exec.parallel_threshold",
                0,
                "并行阈值必须为正",
            ));
        }

        let n = self.state.n_species;
        if n == 0 || n > MAX_SPECIES {
            return Err(ConfigError::invalid(
                "state.n_species",
                n,
                format!("组分数必须在 [1, {MAX_SPECIES}] 范围内"),
            ));
        }

        if !self.eos.gamma.is_finite() || self.eos.gamma <= 1.0 {
            return Err(ConfigError::invalid("eos.gamma", self.eos.gamma, "比热比必须大于 1"));
        }

        if self.eos.mol_weights.len() != n {
            return Err(ConfigError::invalid(
                "eos.mol_weights",
                self.eos.mol_weights.len(),
                format!("摩尔质量个数必须等于组分数 {n}"),
            ));
        }
        if let Some(w) = self.eos.mol_weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ConfigError::invalid("eos.mol_weights", w, "摩尔质量必须为正"));
        }

        if self.eos.species_names.len() != n {
            return Err(ConfigError::invalid(
                "eos.species_names",
                self.eos.species_names.len(),
                format!("组分名个数必须等于组分数 {n}"),
            ));
        }

        Ok(())
    }
}
