// crates/wt_physics/src/lib.rs

//! WaveTrans 透射引擎
//!
//! 纯函数计算：水力条件 + 闸门几何 → 透射系数 → 谱能量缩放。
//!
//! # 模块
//!
//! - [`transmission`]: 单闸门物理公式与整座挡潮闸的汇总
//! - [`application`]: 透射系数作用于方差密度谱
//!
//! # 示例
//!
//! ```
//! use wt_core::{DoorGeometry, Element, HydraulicConditions, RubbleMound};
//! use wt_physics::transmission_through_door;
//!
//! let geom = DoorGeometry {
//!     x: 0.0,
//!     y: 0.0,
//!     name: "D01".into(),
//!     rmb: RubbleMound { height: 1.0, depth: 2.0 },
//!     beam: Element { bottom: 5.0, top: 6.0 },
//!     road: Element { bottom: 7.0, top: 8.0 },
//!     door: None,
//! };
//! let hbc = HydraulicConditions { location: 0, swl: 0.0, hs: 0.0, x: 0.0, y: 0.0 };
//! let kt = transmission_through_door(&hbc, &geom, false).unwrap();
//! assert!((kt - 2.0 / 3.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod transmission;

pub use application::{apply_transmission, door_spectra, transmitted_spectrum};
pub use transmission::{
    door_transmission, pair_doors, transmission_through_barrier, transmission_through_door,
    DoorPair, DoorTransmission,
};
