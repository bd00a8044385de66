// crates/wt_io/src/lib.rs

//! WaveTrans IO 模块
//!
//! 提供透射计算所需的全部文件读写。
//!
//! # 模块
//!
//! - [`swan`]: SWAN 谱文件与表格文件
//! - [`geometry`]: 闸门几何 JSON 描述
//! - [`naming`]: 表格、输出、日志文件的路径约定
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wt_io::{load_geometry, read_spectrum, read_table};
//!
//! let spectrum = read_spectrum(Path::new("osk_run012.sp2"))?;
//! let table = read_table(Path::new("osk_run012.tab"))?;
//! let doors = load_geometry(Path::new("data/dimensions_osk.json"))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod geometry;
pub mod naming;
pub mod swan;

// 重导出常用函数
pub use geometry::{load_geometry, parse_geometry};
pub use swan::{format_spectrum, parse_spectrum, parse_table, read_spectrum, read_table, write_spectrum};
