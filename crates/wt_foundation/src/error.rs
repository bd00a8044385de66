// crates/wt_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `WtError` 枚举和 `WtResult` 类型别名，用于整个项目的错误处理。
//! 所有错误在计算点均不可恢复：引擎不重试、不替换默认值，单个错误即终止整次运行。
//!
//! # 示例
//!
//! ```
//! use wt_foundation::error::{WtError, WtResult};
//!
//! fn load() -> WtResult<()> {
//!     Err(WtError::malformed("dimensions.json", "缺少字段 rmb"))
//! }
//! assert!(load().is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type WtResult<T> = Result<T, WtError>;

/// WaveTrans 错误类型
#[derive(Error, Debug)]
pub enum WtError {
    // ========================================================================
    // 输入资源错误
    // ========================================================================

    /// 文件不存在（几何、谱或表格文件）
    #[error("文件不存在: {path}")]
    NotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 记录缺少必需字段或字段非数值
    #[error("数据格式错误: {source_name}: {message}")]
    Malformed {
        /// 出错的资源（文件名或记录名）
        source_name: String,
        /// 具体错误信息
        message: String,
    },

    /// 文件解析错误
    #[error("文件解析错误: {file} 第{line}行: {message}")]
    Parse {
        /// 文件路径
        file: PathBuf,
        /// 行号（从 1 开始）
        line: usize,
        /// 错误信息
        message: String,
    },

    // ========================================================================
    // 配对与计算错误
    // ========================================================================

    /// 两个数据源的位置数量不一致
    #[error("数据不一致: {what} 期望{expected}, 实际{actual}")]
    DataMismatch {
        /// 数据名称
        what: &'static str,
        /// 期望数量
        expected: usize,
        /// 实际数量
        actual: usize,
    },

    /// 水力条件找不到坐标匹配的闸门几何
    #[error("坐标不匹配: 位置 {index} 的水力条件 ({x}, {y}) 与闸门几何 ({gx}, {gy}) 不对应")]
    NoMatch {
        /// 配对位置
        index: usize,
        /// 水力条件坐标（取整后）
        x: i64,
        /// 水力条件坐标（取整后）
        y: i64,
        /// 几何坐标（取整后）
        gx: i64,
        /// 几何坐标（取整后）
        gy: i64,
    },

    /// 退化几何导致透射公式分母为零
    #[error("无效几何: 闸门 {door}: {message}")]
    InvalidGeometry {
        /// 闸门名称
        door: String,
        /// 具体错误信息
        message: String,
    },

    /// 无法从文件名中解析运行标识
    #[error("文件名 {file} 不匹配运行标识模式 {pattern}")]
    PatternMismatch {
        /// 文件名
        file: String,
        /// 正则模式
        pattern: String,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    // ========================================================================
    // 环境错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl WtError {
    /// 文件不存在
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// 数据格式错误
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// 解析错误
    pub fn parse(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// 数量不一致
    pub fn data_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DataMismatch {
            what,
            expected,
            actual,
        }
    }

    /// 无效几何
    pub fn invalid_geometry(door: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            door: door.into(),
            message: message.into(),
        }
    }

    /// 运行标识模式不匹配
    pub fn pattern_mismatch(file: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::PatternMismatch {
            file: file.into(),
            pattern: pattern.into(),
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// IO 错误（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl WtError {
    /// 检查两个数据源数量是否一致
    #[inline]
    pub fn check_count(what: &'static str, expected: usize, actual: usize) -> WtResult<()> {
        if expected != actual {
            Err(Self::data_mismatch(what, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> WtResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

/// 条件不满足时返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for WtError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for WtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = WtError::not_found("/data/dimensions.json");
        assert!(err.to_string().contains("/data/dimensions.json"));
    }

    #[test]
    fn test_no_match_display() {
        let err = WtError::NoMatch {
            index: 2,
            x: 10,
            y: 20,
            gx: 11,
            gy: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("(10, 20)"));
        assert!(msg.contains("(11, 20)"));
    }

    #[test]
    fn test_check_count() {
        assert!(WtError::check_count("locations", 4, 4).is_ok());
        assert!(matches!(
            WtError::check_count("locations", 4, 3),
            Err(WtError::DataMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_check_index() {
        assert!(WtError::check_index("door", 2, 3).is_ok());
        assert!(WtError::check_index("door", 3, 3).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: WtError = io_err.into();
        assert!(matches!(err, WtError::Io { .. }));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: f64) -> WtResult<()> {
            ensure!(value >= 0.0, WtError::malformed("test", "value must be non-negative"));
            Ok(())
        }

        assert!(check(1.0).is_ok());
        assert!(check(-1.0).is_err());
    }
}
