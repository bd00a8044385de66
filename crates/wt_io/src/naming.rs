// crates/wt_io/src/naming.rs

//! 路径与文件命名约定
//!
//! - 表格文件：与谱文件同目录同名，扩展名不同
//! - 运行标识：用正则从谱文件名中提取，作为输出子目录名
//! - 输出文件：`<输出目录>/<运行标识>/<闸门名>.<扩展名>`
//! - 日志文件：谱文件去掉扩展名后加 `.log`

use std::path::{Path, PathBuf};

use regex::Regex;
use wt_foundation::{WtError, WtResult};

/// 一维谱的默认扩展名
pub const SP1_EXTENSION: &str = "sp1";
/// 二维谱的默认扩展名
pub const SP2_EXTENSION: &str = "sp2";

/// 编译运行标识正则
pub fn compile_pattern(pattern: &str) -> WtResult<Regex> {
    Regex::new(pattern).map_err(|e| WtError::invalid_config("run_id_pattern", pattern, e.to_string()))
}

/// 与谱文件配套的表格文件路径
pub fn companion_table_path(spectrum: &Path, extension: &str) -> PathBuf {
    spectrum.with_extension(extension)
}

/// 日志文件路径
pub fn log_path(spectrum: &Path) -> PathBuf {
    spectrum.with_extension("log")
}

/// 从谱文件名中提取运行标识
///
/// 优先取命名分组 `run`，其次第一个分组，最后取整个匹配。
///
/// # 错误
///
/// 文件名不匹配时返回 `PatternMismatch`。
pub fn run_identifier(spectrum: &Path, pattern: &Regex) -> WtResult<String> {
    let file_name = spectrum
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let captures = pattern
        .captures(&file_name)
        .ok_or_else(|| WtError::pattern_mismatch(file_name.as_str(), pattern.as_str()))?;

    let id = captures
        .name("run")
        .or_else(|| captures.get(1))
        .or_else(|| captures.get(0))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    if id.is_empty() {
        return Err(WtError::pattern_mismatch(file_name, pattern.as_str()));
    }
    Ok(id)
}

/// 将闸门名称转换为安全的文件名
pub fn sanitize_file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 输出谱的扩展名
///
/// 优先使用配置值，其次输入文件的扩展名，最后按谱维度选择 `sp1`/`sp2`。
pub fn output_extension(spectrum: &Path, configured: Option<&str>, directional: bool) -> String {
    if let Some(ext) = configured {
        return ext.trim_start_matches('.').to_string();
    }
    spectrum
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| {
            if directional {
                SP2_EXTENSION.to_string()
            } else {
                SP1_EXTENSION.to_string()
            }
        })
}

/// 单个闸门的输出谱路径
pub fn door_output_path(out_dir: &Path, run_id: &str, door_name: &str, extension: &str) -> PathBuf {
    out_dir
        .join(run_id)
        .join(format!("{}.{}", sanitize_file_stem(door_name), extension))
}
