// crates/wt_core/src/conditions.rs

//! 水力边界条件
//!
//! 每个位置一条记录：静水位、有效波高与坐标。
//! 有效波高取自谱文件，静水位与坐标取自同一计算的表格输出，
//! 两者按位置索引对齐。

use serde::{Deserialize, Serialize};
use tracing::debug;
use wt_foundation::{ensure, WtError, WtResult};

use crate::spectrum::VarianceSpectrum;
use crate::table::SwanTable;

/// 表格中的静水位列
pub const COLUMN_WATER_LEVEL: &str = "Watlev";
/// 表格中的 x 坐标列
pub const COLUMN_X: &str = "Xp";
/// 表格中的 y 坐标列
pub const COLUMN_Y: &str = "Yp";

/// 单个位置的水力边界条件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicConditions {
    /// 在谱与表格中的位置索引
    pub location: usize,
    /// 静水位 [m]
    pub swl: f64,
    /// 有效波高 [m]
    pub hs: f64,
    /// x 坐标
    pub x: f64,
    /// y 坐标
    pub y: f64,
}

impl HydraulicConditions {
    /// 有效水面高程：静水位加半个有效波高
    #[inline]
    pub fn crest(&self) -> f64 {
        self.swl + self.hs / 2.0
    }

    /// 取整后的坐标，用于与闸门几何配对
    #[inline]
    pub fn rounded_position(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// 由谱与表格导出各位置的水力边界条件
///
/// # 错误
///
/// - 谱与表格位置数不一致：`DataMismatch`
/// - 表格缺少 `Watlev`/`Xp`/`Yp` 列：`Malformed`
/// - 某位置无谱数据（有效波高非有限值）：`Malformed`
/// - 静水位或坐标不是有限数值：`Malformed`
pub fn derive_conditions(
    spectrum: &VarianceSpectrum,
    table: &SwanTable,
) -> WtResult<Vec<HydraulicConditions>> {
    WtError::check_count("table locations", spectrum.n_locations(), table.n_rows())?;

    let swl = table.column(COLUMN_WATER_LEVEL)?;
    let xs = table.column(COLUMN_X)?;
    let ys = table.column(COLUMN_Y)?;
    let hm0 = spectrum.hm0();

    let mut conditions = Vec::with_capacity(hm0.len());
    for (location, &hs) in hm0.iter().enumerate() {
        ensure!(
            hs.is_finite(),
            WtError::malformed("spectrum", format!("位置 {location} 没有有效谱数据"))
        );
        ensure!(
            swl[location].is_finite(),
            WtError::malformed("table", format!("位置 {location} 的静水位不是有限数值"))
        );
        ensure!(
            xs[location].is_finite() && ys[location].is_finite(),
            WtError::malformed(
                "table",
                format!("位置 {location} 的坐标不是有限数值: ({}, {})", xs[location], ys[location])
            )
        );

        let hbc = HydraulicConditions {
            location,
            swl: swl[location],
            hs,
            x: xs[location],
            y: ys[location],
        };
        debug!(
            "位置 {}: ({:.1}, {:.1}) swl={:.3} m, Hs={:.3} m",
            location, hbc.x, hbc.y, hbc.swl, hbc.hs
        );
        conditions.push(hbc);
    }

    Ok(conditions)
}
