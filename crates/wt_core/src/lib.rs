// crates/wt_core/src/lib.rs

//! WaveTrans Core Layer
//!
//! 透射计算的数据模型。
//!
//! # 模块概览
//!
//! - [`geometry`]: 闸门几何（抛石基床、横梁、路面）
//! - [`conditions`]: 水力边界条件及其由谱和表格的导出
//! - [`spectrum`]: 多位置方差密度谱
//! - [`table`]: 表格输出的列存储
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wt_cli
//! Layer 4: wt_config
//! Layer 3: wt_io, wt_physics
//! Layer 2: wt_core        (本层)
//! Layer 1: wt_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conditions;
pub mod geometry;
pub mod spectrum;
pub mod table;

// 重导出核心类型
pub use conditions::{derive_conditions, HydraulicConditions};
pub use geometry::{DoorGeometry, DoorLeaf, Element, RubbleMound};
pub use spectrum::{
    CoordinateKind, DirectionConvention, Directions, FrequencyKind, Location, Quantity,
    VarianceSpectrum,
};
pub use table::SwanTable;
