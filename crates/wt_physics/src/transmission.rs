// crates/wt_physics/src/transmission.rs

//! 挡潮闸波浪透射模型
//!
//! 由水力边界条件与闸门几何计算每个闸门的透射系数 Kt。
//!
//! # 单闸门公式
//!
//! ```text
//! crest = swl + Hs / 2
//! obstr = rmb.height
//!       + min(crest - beam.bottom, beam.top - beam.bottom)   (crest > beam.bottom)
//!       + min(crest - road.bottom, road.top - road.bottom)   (crest > road.bottom)
//!       + rmb.depth + beam.bottom                             (闸门关闭)
//! Kt    = clamp(1 - obstr / (crest + rmb.depth + rmb.height), 0, 1)
//! ```
//!
//! # 配对
//!
//! 水力条件与闸门几何按位置顺序配对，并以取整坐标校验对齐。

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wt_core::{DoorGeometry, HydraulicConditions};
use wt_foundation::{WtError, WtResult};

/// 一个闸门的水力条件与几何
#[derive(Debug, Clone, Copy)]
pub struct DoorPair<'a> {
    /// 闸门前的水力条件
    pub hbc: &'a HydraulicConditions,
    /// 闸门几何
    pub geometry: &'a DoorGeometry,
}

impl<'a> DoorPair<'a> {
    /// 配对并校验取整坐标一致
    pub fn new(
        index: usize,
        hbc: &'a HydraulicConditions,
        geometry: &'a DoorGeometry,
    ) -> WtResult<Self> {
        let (x, y) = hbc.rounded_position();
        let (gx, gy) = geometry.rounded_position();
        if (x, y) != (gx, gy) {
            return Err(WtError::NoMatch { index, x, y, gx, gy });
        }
        Ok(Self { hbc, geometry })
    }
}

/// 单个闸门的透射结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorTransmission {
    /// 闸门在几何序列中的索引
    pub index: usize,
    /// 对应的谱位置索引
    pub location: usize,
    /// 闸门名称
    pub name: String,
    /// x 坐标
    pub x: f64,
    /// y 坐标
    pub y: f64,
    /// 有效水面高程 [m]
    pub crest: f64,
    /// 阻挡高度 [m]
    pub obstruction: f64,
    /// 透射系数
    pub kt: f64,
}

impl DoorTransmission {
    /// 能量缩放因子 Kt²
    #[inline]
    pub fn energy_factor(&self) -> f64 {
        self.kt * self.kt
    }
}

/// 阻挡高度
fn obstruction(crest: f64, geom: &DoorGeometry, closed: bool) -> f64 {
    // 抛石基床始终阻挡
    let mut obstr = geom.rmb.height;

    obstr += geom.beam.submerged(crest);
    obstr += geom.road.submerged(crest);

    if closed {
        obstr += geom.closed_door_extent();
    }

    obstr
}

/// 计算 (crest, obstr, Kt)
fn evaluate(
    hbc: &HydraulicConditions,
    geom: &DoorGeometry,
    closed: bool,
) -> WtResult<(f64, f64, f64)> {
    let crest = hbc.crest();
    let obstr = obstruction(crest, geom, closed);

    let column = crest + geom.rmb.depth + geom.rmb.height;
    if !column.is_finite() || column <= 0.0 {
        return Err(WtError::invalid_geometry(
            geom.name.as_str(),
            format!(
                "水柱高度 crest + rmb.depth + rmb.height = {column} (crest={crest}) 不为正"
            ),
        ));
    }

    let kt = (1.0 - obstr / column).clamp(0.0, 1.0);
    Ok((crest, obstr, kt))
}

/// 单个闸门的透射系数
///
/// # 错误
///
/// 水柱高度 `crest + rmb.depth + rmb.height` 不为正时返回 `InvalidGeometry`。
pub fn transmission_through_door(
    hbc: &HydraulicConditions,
    geom: &DoorGeometry,
    closed: bool,
) -> WtResult<f64> {
    evaluate(hbc, geom, closed).map(|(_, _, kt)| kt)
}

/// 单个闸门的透射结果（含中间量）
pub fn door_transmission(
    index: usize,
    pair: DoorPair<'_>,
    closed: bool,
) -> WtResult<DoorTransmission> {
    let (crest, obstruction, kt) = evaluate(pair.hbc, pair.geometry, closed)?;
    debug!(
        "闸门 {} [{}]: crest={:.3} m, obstr={:.3} m, Kt={:.4}",
        pair.geometry.name, index, crest, obstruction, kt
    );

    Ok(DoorTransmission {
        index,
        location: pair.hbc.location,
        name: pair.geometry.name.clone(),
        x: pair.geometry.x,
        y: pair.geometry.y,
        crest,
        obstruction,
        kt,
    })
}

/// 按位置配对全部水力条件与闸门几何
///
/// # 错误
///
/// - 数量不一致：`DataMismatch`
/// - 取整坐标不一致：`NoMatch`
pub fn pair_doors<'a>(
    hbcs: &'a [HydraulicConditions],
    geoms: &'a [DoorGeometry],
) -> WtResult<Vec<DoorPair<'a>>> {
    WtError::check_count("door locations", geoms.len(), hbcs.len())?;
    hbcs.iter()
        .zip(geoms)
        .enumerate()
        .map(|(i, (hbc, geom))| DoorPair::new(i, hbc, geom))
        .collect()
}

/// 整座挡潮闸的透射系数
///
/// `door_index` 给定时只计算该位置的闸门，结果恰有一个元素；
/// 否则每个闸门一个结果，顺序与输入一致。`closed` 对所有闸门相同。
pub fn transmission_through_barrier(
    hbcs: &[HydraulicConditions],
    geoms: &[DoorGeometry],
    closed: bool,
    door_index: Option<usize>,
) -> WtResult<Vec<DoorTransmission>> {
    let pairs = pair_doors(hbcs, geoms)?;

    let results = match door_index {
        Some(i) => {
            WtError::check_index("door", i, pairs.len())?;
            vec![door_transmission(i, pairs[i], closed)?]
        }
        None => pairs
            .par_iter()
            .enumerate()
            .map(|(i, pair)| door_transmission(i, *pair, closed))
            .collect::<WtResult<Vec<_>>>()?,
    };

    info!(
        "透射计算完成: {} 个闸门, 闸门{}",
        results.len(),
        if closed { "关闭" } else { "开启" }
    );
    Ok(results)
}
