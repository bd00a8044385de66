// crates/wt_io/src/swan/mod.rs

//! SWAN 文件格式
//!
//! - [`spectrum`]: 一维/二维谱文件读写
//! - [`table`]: 表格输出读取

pub mod spectrum;
pub mod table;

pub use spectrum::{format_spectrum, parse_spectrum, read_spectrum, write_spectrum};
pub use table::{parse_table, read_table};
