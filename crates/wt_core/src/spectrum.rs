// crates/wt_core/src/spectrum.rs

//! 方差密度谱
//!
//! 多位置的波浪方差密度谱，按 `[位置][频率][方向]` 顺序展平存储。
//! 一维谱（无方向）视为方向数为 1。
//!
//! 第一个物理量为方差（或能量）密度，透射只缩放该物理量；
//! 一维谱附带的平均方向 `CDIR` 与方向分布宽度 `DSPRDEG` 原样保留。
//! 无数据（`NODATA`）的位置以 NaN 存储。

use serde::{Deserialize, Serialize};
use wt_foundation::{ensure, WtError, WtResult};

/// 位置坐标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoordinateKind {
    /// 笛卡尔坐标 [m]
    #[default]
    Cartesian,
    /// 经纬度 [度]
    Spherical,
}

/// 频率类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FrequencyKind {
    /// 绝对频率 [Hz]
    #[default]
    Absolute,
    /// 相对频率 [Hz]
    Relative,
}

/// 方向约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionConvention {
    /// 航海约定（来向，顺时针自北）
    Nautical,
    /// 笛卡尔约定（去向，逆时针自东）
    Cartesian,
}

/// 谱位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// x 坐标（或经度）
    pub x: f64,
    /// y 坐标（或纬度）
    pub y: f64,
}

/// 谱方向
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    /// 方向约定
    pub convention: DirectionConvention,
    /// 方向 [度]
    pub values: Vec<f64>,
}

impl Directions {
    /// 方向分辨率 [度]
    ///
    /// 取相邻方向在圆周上的平均间距；仅一个方向时为 1。
    pub fn bin_width(&self) -> f64 {
        if self.values.len() < 2 {
            return 1.0;
        }
        let total: f64 = self
            .values
            .windows(2)
            .map(|w| {
                let d = (w[1] - w[0]).rem_euclid(360.0);
                d.min(360.0 - d)
            })
            .sum();
        total / (self.values.len() - 1) as f64
    }
}

/// 谱中的一个物理量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// 名称，如 `VaDens`、`CDIR`
    pub name: String,
    /// 单位，如 `m2/Hz`
    pub unit: String,
    /// 异常值
    pub exception: f64,
    /// 数值，`[位置][频率][方向]`
    pub values: Vec<f64>,
}

/// 多位置方差密度谱
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceSpectrum {
    coordinates: CoordinateKind,
    locations: Vec<Location>,
    frequency_kind: FrequencyKind,
    frequencies: Vec<f64>,
    directions: Option<Directions>,
    quantities: Vec<Quantity>,
    comments: Vec<String>,
}

impl VarianceSpectrum {
    /// 创建谱并校验各物理量的数组长度
    pub fn new(
        coordinates: CoordinateKind,
        locations: Vec<Location>,
        frequency_kind: FrequencyKind,
        frequencies: Vec<f64>,
        directions: Option<Directions>,
        quantities: Vec<Quantity>,
    ) -> WtResult<Self> {
        ensure!(
            !quantities.is_empty(),
            WtError::malformed("spectrum", "至少需要一个物理量")
        );
        ensure!(
            !frequencies.is_empty(),
            WtError::malformed("spectrum", "频率数为零")
        );
        let n_dir = directions.as_ref().map_or(1, |d| d.values.len());
        ensure!(n_dir > 0, WtError::malformed("spectrum", "方向数为零"));

        let expected = locations.len() * frequencies.len() * n_dir;
        for q in &quantities {
            WtError::check_count("spectrum values", expected, q.values.len())?;
        }

        Ok(Self {
            coordinates,
            locations,
            frequency_kind,
            frequencies,
            directions,
            quantities,
            comments: Vec::new(),
        })
    }

    /// 附加注释行（写出时保留）
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// 坐标类型
    pub fn coordinates(&self) -> CoordinateKind {
        self.coordinates
    }

    /// 位置
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// 频率类型
    pub fn frequency_kind(&self) -> FrequencyKind {
        self.frequency_kind
    }

    /// 频率 [Hz]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// 方向（一维谱为 None）
    pub fn directions(&self) -> Option<&Directions> {
        self.directions.as_ref()
    }

    /// 全部物理量
    pub fn quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// 注释行
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// 位置数
    pub fn n_locations(&self) -> usize {
        self.locations.len()
    }

    /// 频率数
    pub fn n_frequencies(&self) -> usize {
        self.frequencies.len()
    }

    /// 方向数（一维谱为 1）
    pub fn n_directions(&self) -> usize {
        self.directions.as_ref().map_or(1, |d| d.values.len())
    }

    /// 是否为二维（方向）谱
    pub fn is_directional(&self) -> bool {
        self.directions.is_some()
    }

    /// 单个位置的数据长度
    #[inline]
    fn block_len(&self) -> usize {
        self.n_frequencies() * self.n_directions()
    }

    /// 方差密度（第一个物理量）
    pub fn energy(&self) -> &Quantity {
        &self.quantities[0]
    }

    /// 某位置的方差密度
    pub fn location_energy(&self, location: usize) -> WtResult<&[f64]> {
        WtError::check_index("location", location, self.n_locations())?;
        let n = self.block_len();
        Ok(&self.quantities[0].values[location * n..(location + 1) * n])
    }

    /// 各位置的谱有效波高 Hm0 = 4·√m0
    ///
    /// m0 对频率使用梯形积分，对方向乘以方向分辨率求和。
    /// 无数据位置返回 NaN。
    pub fn hm0(&self) -> Vec<f64> {
        let n_freq = self.n_frequencies();
        let n_dir = self.n_directions();
        let d_theta = self.directions.as_ref().map_or(1.0, Directions::bin_width);
        let energy = &self.quantities[0].values;

        (0..self.n_locations())
            .map(|loc| {
                let block = &energy[loc * n_freq * n_dir..(loc + 1) * n_freq * n_dir];
                let e_f: Vec<f64> = block
                    .chunks(n_dir)
                    .map(|row| row.iter().sum::<f64>() * d_theta)
                    .collect();
                let m0 = trapezoid(&self.frequencies, &e_f);
                4.0 * m0.sqrt()
            })
            .collect()
    }

    /// 取出单个位置的子谱
    pub fn select_location(&self, location: usize) -> WtResult<VarianceSpectrum> {
        WtError::check_index("location", location, self.n_locations())?;
        let n = self.block_len();
        let quantities = self
            .quantities
            .iter()
            .map(|q| Quantity {
                name: q.name.clone(),
                unit: q.unit.clone(),
                exception: q.exception,
                values: q.values[location * n..(location + 1) * n].to_vec(),
            })
            .collect();

        Ok(Self {
            coordinates: self.coordinates,
            locations: vec![self.locations[location]],
            frequency_kind: self.frequency_kind,
            frequencies: self.frequencies.clone(),
            directions: self.directions.clone(),
            quantities,
            comments: self.comments.clone(),
        })
    }

    /// 将某位置的方差密度乘以 `factor`，其他位置与其他物理量不变
    pub fn scale_location(&mut self, location: usize, factor: f64) -> WtResult<()> {
        WtError::check_index("location", location, self.n_locations())?;
        let n = self.block_len();
        for v in &mut self.quantities[0].values[location * n..(location + 1) * n] {
            *v *= factor;
        }
        Ok(())
    }
}

/// 梯形积分
fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_dimensional(values: Vec<f64>, n_loc: usize) -> VarianceSpectrum {
        let locations = (0..n_loc)
            .map(|i| Location { x: i as f64, y: 0.0 })
            .collect();
        VarianceSpectrum::new(
            CoordinateKind::Cartesian,
            locations,
            FrequencyKind::Absolute,
            vec![0.1, 0.2, 0.3],
            None,
            vec![Quantity {
                name: "VaDens".into(),
                unit: "m2/Hz".into(),
                exception: -99.0,
                values,
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = VarianceSpectrum::new(
            CoordinateKind::Cartesian,
            vec![Location { x: 0.0, y: 0.0 }],
            FrequencyKind::Absolute,
            vec![0.1, 0.2],
            None,
            vec![Quantity {
                name: "VaDens".into(),
                unit: "m2/Hz".into(),
                exception: -99.0,
                values: vec![1.0],
            }],
        );
        assert!(matches!(result, Err(WtError::DataMismatch { .. })));
    }

    #[test]
    fn test_hm0_flat_spectrum() {
        // m0 = 1.0 m2/Hz × 0.2 Hz = 0.2
        let spc = one_dimensional(vec![1.0, 1.0, 1.0], 1);
        let hs = spc.hm0();
        assert!((hs[0] - 4.0 * 0.2_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_hm0_directional_uses_bin_width() {
        let spc = VarianceSpectrum::new(
            CoordinateKind::Cartesian,
            vec![Location { x: 0.0, y: 0.0 }],
            FrequencyKind::Absolute,
            vec![0.1, 0.2],
            Some(Directions {
                convention: DirectionConvention::Nautical,
                values: vec![0.0, 90.0, 180.0, 270.0],
            }),
            vec![Quantity {
                name: "VaDens".into(),
                unit: "m2/Hz/degr".into(),
                exception: -99.0,
                values: vec![0.01; 8],
            }],
        )
        .unwrap();
        // E(f) = 4 × 0.01 × 90 = 3.6, m0 = 3.6 × 0.1 = 0.36
        let hs = spc.hm0();
        assert!((hs[0] - 4.0 * 0.36_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_hm0_nodata_is_nan() {
        let spc = one_dimensional(vec![1.0, 1.0, 1.0, f64::NAN, f64::NAN, f64::NAN], 2);
        let hs = spc.hm0();
        assert!(hs[0].is_finite());
        assert!(hs[1].is_nan());
    }

    #[test]
    fn test_bin_width_wraps_circle() {
        let dirs = Directions {
            convention: DirectionConvention::Nautical,
            values: vec![350.0, 0.0, 10.0],
        };
        assert!((dirs.bin_width() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_location_only_touches_target() {
        let mut spc = one_dimensional(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2);
        spc.scale_location(1, 0.25).unwrap();
        assert_eq!(spc.location_energy(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(spc.location_energy(1).unwrap(), &[1.0, 1.25, 1.5]);
    }

    #[test]
    fn test_select_location() {
        let spc = one_dimensional(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2);
        let sub = spc.select_location(1).unwrap();
        assert_eq!(sub.n_locations(), 1);
        assert_eq!(sub.locations()[0].x, 1.0);
        assert_eq!(sub.location_energy(0).unwrap(), &[4.0, 5.0, 6.0]);
        assert!(spc.select_location(2).is_err());
    }
}
