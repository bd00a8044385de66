// crates/wt_foundation/src/lib.rs

//! WaveTrans Foundation Layer
//!
//! 基础层，提供整个项目共享的错误类型。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `WtError` 与 `ensure!` 宏

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// 重导出常用类型
pub use error::{WtError, WtResult};
