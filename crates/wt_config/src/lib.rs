// crates/wt_config/src/lib.rs

//! WaveTrans Config Layer (Layer 4)
//!
//! 配置层，提供透射运行的显式配置。
//!
//! # 模块概览
//!
//! - [`transmission_config`]: TransmissionConfig 运行配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wt_cli        ─> uses TransmissionConfig
//! Layer 4: wt_config     ─> TransmissionConfig (本层)
//! Layer 3: wt_io, wt_physics
//! Layer 2: wt_core
//! Layer 1: wt_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod transmission_config;

// 重导出核心类型
pub use error::ConfigError;
pub use transmission_config::{TransmissionConfig, BUNDLED_GEOMETRY_FILE};
