// crates/wt_config/src/transmission_config.rs

//! TransmissionConfig - 透射运行配置
//!
//! 替代进程级的默认几何文件路径：几何文件、表格扩展名、运行标识模式等
//! 均作为显式配置值传入。所有字段都有默认值，JSON 文件可只写需要覆盖的项。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 透射运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionConfig {
    /// 闸门几何描述文件
    #[serde(default = "default_geometry_file")]
    pub geometry_file: PathBuf,

    /// 配套表格文件扩展名
    #[serde(default = "default_table_extension")]
    pub table_extension: String,

    /// 从谱文件名提取运行标识的正则
    #[serde(default = "default_run_id_pattern")]
    pub run_id_pattern: String,

    /// 输出谱扩展名（None 时沿用输入扩展名）
    #[serde(default)]
    pub output_extension: Option<String>,

    /// 是否写出透射系数汇总 `transmission.json`
    #[serde(default = "default_write_summary")]
    pub write_summary: bool,
}

/// 随工作区发布的闸门几何文件（相对工作区根目录）
pub const BUNDLED_GEOMETRY_FILE: &str = "data/dimensions_osk.json";

/// 默认几何文件按工作区位置解析，与当前工作目录无关
fn default_geometry_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(BUNDLED_GEOMETRY_FILE)
}
fn default_table_extension() -> String { "tab".to_string() }
fn default_run_id_pattern() -> String { r"(?P<run>[Rr]un[_-]?\d+)".to_string() }
fn default_write_summary() -> bool { true }

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            geometry_file: default_geometry_file(),
            table_extension: default_table_extension(),
            run_id_pattern: default_run_id_pattern(),
            output_extension: None,
            write_summary: default_write_summary(),
        }
    }
}

impl TransmissionConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        let config: TransmissionConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geometry_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "geometry_file".to_string(),
                value: String::new(),
                reason: "几何文件路径不能为空".to_string(),
            });
        }

        if self.table_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "table_extension".to_string(),
                value: self.table_extension.clone(),
                reason: "表格扩展名不能为空".to_string(),
            });
        }

        if let Some(ext) = &self.output_extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "output_extension".to_string(),
                    value: ext.clone(),
                    reason: "输出扩展名不能为空".to_string(),
                });
            }
        }

        if let Err(e) = regex::Regex::new(&self.run_id_pattern) {
            return Err(ConfigError::InvalidValue {
                key: "run_id_pattern".to_string(),
                value: self.run_id_pattern.clone(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    /// 表格扩展名（去掉前导点）
    pub fn table_extension(&self) -> &str {
        self.table_extension.trim_start_matches('.')
    }

    /// 覆盖几何文件路径
    pub fn with_geometry_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.geometry_file = path.into();
        self
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}
