// apps/wt_cli/src/logging.rs

//! 日志初始化
//!
//! 控制台按 `--log-level` 过滤；日志文件（若给定）始终记录 DEBUG 及以上。

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt;

/// 解析日志级别，无法识别时使用 INFO
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// 安装全局日志订阅者
///
/// 日志文件以追加方式打开；无法打开时只输出到控制台并给出警告。
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let console = fmt::layer().with_target(false).with_filter(level);

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            ),
            Err(e) => {
                open_error = Some(format!("无法打开日志文件 {}: {}", path.display(), e));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()?;

    if let Some(msg) = open_error {
        warn!("{}", msg);
    }
    Ok(())
}
