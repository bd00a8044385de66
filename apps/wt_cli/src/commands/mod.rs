// apps/wt_cli/src/commands/mod.rs

//! 子命令实现

pub mod info;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use wt_config::TransmissionConfig;
use wt_foundation::WtError;

/// 加载运行配置：配置文件（可选）+ 命令行覆盖
pub(crate) fn load_config(
    config: Option<&Path>,
    geometry: Option<&Path>,
) -> Result<TransmissionConfig> {
    let mut cfg = match config {
        Some(path) => TransmissionConfig::from_file(path)
            .map_err(WtError::from)
            .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
        None => TransmissionConfig::default(),
    };

    if let Some(path) = geometry {
        cfg = cfg.with_geometry_file(path);
    }

    debug!("运行配置: {:?}", cfg);
    Ok(cfg)
}
