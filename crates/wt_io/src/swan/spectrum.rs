// crates/wt_io/src/swan/spectrum.rs

//! SWAN 谱文件读写
//!
//! 支持平稳（无 `TIME` 段）的一维与二维 SWAN 谱文件：
//!
//! ```text
//! SWAN   1                                Swan standard spectral file
//! $   注释行
//! LOCATIONS | LONLAT                      位置数 + 每行 x y
//! AFREQ | RFREQ                           频率数 + 每行一个频率
//! NDIR | CDIR                             （二维）方向数 + 每行一个方向
//! QUANT                                   物理量数 + 每个量的名称/单位/异常值
//! LOCATION n                              （一维）每个频率一行，各物理量一列
//! FACTOR                                  （二维）缩放因子 + 每个频率一行整数
//! ZERO | NODATA
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wt_core::{
    CoordinateKind, DirectionConvention, Directions, FrequencyKind, Location, Quantity,
    VarianceSpectrum,
};
use wt_foundation::{WtError, WtResult};

/// 二维谱整数编码的最大值
const MAX_SCALED_VALUE: f64 = 99999.0;

/// 写出时未保留注释时使用的默认注释
const DEFAULT_COMMENT: &str = "$   Data produced by WaveTrans barrier transmission";

/// 去除空行与注释后的行游标
struct LineCursor<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
    origin: PathBuf,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str, origin: &Path) -> (Self, Vec<String>) {
        let mut lines = Vec::new();
        let mut comments = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('$') {
                comments.push(trimmed.to_string());
                continue;
            }
            lines.push((i + 1, trimmed));
        }
        let cursor = Self {
            lines,
            pos: 0,
            origin: origin.to_path_buf(),
        };
        (cursor, comments)
    }

    fn error(&self, line: usize, message: impl Into<String>) -> WtError {
        WtError::parse(&self.origin, line, message)
    }

    fn current_line(&self) -> usize {
        self.lines
            .get(self.pos)
            .or_else(|| self.lines.last())
            .map_or(0, |(n, _)| *n)
    }

    fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn next_line(&mut self) -> WtResult<(usize, &'a str)> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.error(self.current_line(), "文件意外结束"))?;
        self.pos += 1;
        Ok(line)
    }

    /// 下一行的第一个词（大写）
    fn keyword(&mut self) -> WtResult<(usize, String)> {
        let (n, line) = self.next_line()?;
        let word = line.split_whitespace().next().unwrap_or_default();
        Ok((n, word.to_ascii_uppercase()))
    }

    /// 下一行的第一个词
    fn first_token(&mut self) -> WtResult<(usize, &'a str)> {
        let (n, line) = self.next_line()?;
        Ok((n, line.split_whitespace().next().unwrap_or_default()))
    }

    fn next_count(&mut self) -> WtResult<usize> {
        let (n, token) = self.first_token()?;
        token
            .parse::<usize>()
            .map_err(|_| self.error(n, format!("期望整数计数, 实际 '{token}'")))
    }

    fn next_value(&mut self) -> WtResult<f64> {
        let (n, token) = self.first_token()?;
        parse_float(token).ok_or_else(|| self.error(n, format!("期望数值, 实际 '{token}'")))
    }

    /// 读取 `count` 个数值，可跨行
    fn next_values(&mut self, count: usize) -> WtResult<Vec<f64>> {
        let mut values = Vec::with_capacity(count);
        while values.len() < count {
            let (n, line) = self.next_line()?;
            for token in line.split_whitespace() {
                let v = parse_float(token)
                    .ok_or_else(|| self.error(n, format!("期望数值, 实际 '{token}'")))?;
                values.push(v);
            }
        }
        if values.len() != count {
            return Err(self.error(
                self.current_line(),
                format!("期望 {count} 个数值, 实际 {}", values.len()),
            ));
        }
        Ok(values)
    }
}

fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// 从文件读取 SWAN 谱
///
/// # 错误
///
/// - 文件不存在：`NotFound`
/// - 格式错误或非平稳谱：`Parse`
pub fn read_spectrum(path: &Path) -> WtResult<VarianceSpectrum> {
    if !path.exists() {
        return Err(WtError::not_found(path));
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        WtError::io_with_source(format!("无法读取谱文件 {}", path.display()), e)
    })?;
    let spectrum = parse_spectrum(&text, path)?;
    info!(
        "读取谱文件 {}: {} 个位置, {} 个频率, {} 个方向",
        path.display(),
        spectrum.n_locations(),
        spectrum.n_frequencies(),
        spectrum.n_directions()
    );
    Ok(spectrum)
}

/// 从字符串解析 SWAN 谱，`origin` 仅用于错误信息
pub fn parse_spectrum(text: &str, origin: &Path) -> WtResult<VarianceSpectrum> {
    let (mut cur, comments) = LineCursor::new(text, origin);

    let (n, word) = cur.keyword()?;
    if word != "SWAN" {
        return Err(cur.error(n, format!("缺少 SWAN 文件头, 实际 '{word}'")));
    }

    let mut coordinates = CoordinateKind::Cartesian;
    let mut locations: Option<Vec<Location>> = None;
    let mut frequency_kind = FrequencyKind::Absolute;
    let mut frequencies: Option<Vec<f64>> = None;
    let mut directions: Option<Directions> = None;

    // 文件头各段，直到 QUANT
    let headers = loop {
        let (n, word) = cur.keyword()?;
        match word.as_str() {
            "TIME" => {
                return Err(cur.error(n, "不支持非平稳（含 TIME 段）的谱文件"));
            }
            "LOCATIONS" | "LONLAT" => {
                coordinates = if word == "LONLAT" {
                    CoordinateKind::Spherical
                } else {
                    CoordinateKind::Cartesian
                };
                let count = cur.next_count()?;
                let xy = cur.next_values(2 * count)?;
                locations = Some(
                    xy.chunks(2)
                        .map(|p| Location { x: p[0], y: p[1] })
                        .collect(),
                );
            }
            "AFREQ" | "RFREQ" => {
                frequency_kind = if word == "RFREQ" {
                    FrequencyKind::Relative
                } else {
                    FrequencyKind::Absolute
                };
                let count = cur.next_count()?;
                frequencies = Some(cur.next_values(count)?);
            }
            "NDIR" | "CDIR" => {
                let convention = if word == "NDIR" {
                    DirectionConvention::Nautical
                } else {
                    DirectionConvention::Cartesian
                };
                let count = cur.next_count()?;
                directions = Some(Directions {
                    convention,
                    values: cur.next_values(count)?,
                });
            }
            "QUANT" => {
                let count = cur.next_count()?;
                let mut quantities = Vec::with_capacity(count);
                for _ in 0..count {
                    let (_, name) = cur.first_token()?;
                    let (_, unit) = cur.first_token()?;
                    let exception = cur.next_value()?;
                    quantities.push((name.to_string(), unit.to_string(), exception));
                }
                break quantities;
            }
            other => {
                return Err(cur.error(n, format!("未知的谱文件关键字 '{other}'")));
            }
        }
    };

    let line = cur.current_line();
    let locations = locations.ok_or_else(|| cur.error(line, "缺少 LOCATIONS 段"))?;
    let frequencies = frequencies.ok_or_else(|| cur.error(line, "缺少 AFREQ/RFREQ 段"))?;
    if headers.is_empty() {
        return Err(cur.error(line, "QUANT 段没有物理量"));
    }

    let n_loc = locations.len();
    let n_freq = frequencies.len();
    let n_dir = directions.as_ref().map_or(1, |d| d.values.len());
    let n_quant = headers.len();
    let directional = directions.is_some();
    if directional && n_quant != 1 {
        return Err(cur.error(line, format!("二维谱应只有一个物理量, 实际 {n_quant}")));
    }

    let block = n_freq * n_dir;
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(n_loc * block); n_quant];

    for loc in 0..n_loc {
        let (n, word) = cur.keyword()?;
        match word.as_str() {
            "NODATA" => {
                for q in values.iter_mut() {
                    q.extend(std::iter::repeat(f64::NAN).take(block));
                }
            }
            "ZERO" => {
                for q in values.iter_mut() {
                    q.extend(std::iter::repeat(0.0).take(block));
                }
            }
            "LOCATION" if !directional => {
                let rows = cur.next_values(n_freq * n_quant)?;
                for row in rows.chunks(n_quant) {
                    for (qi, &v) in row.iter().enumerate() {
                        let exception = headers[qi].2;
                        values[qi].push(if v == exception { f64::NAN } else { v });
                    }
                }
            }
            "FACTOR" if directional => {
                let factor = cur.next_value()?;
                let ints = cur.next_values(block)?;
                values[0].extend(ints.iter().map(|&i| i * factor));
            }
            other => {
                return Err(cur.error(n, format!("位置 {} 的数据块关键字无效: '{other}'", loc + 1)));
            }
        }
    }

    if !cur.is_done() {
        debug!("谱文件 {} 末尾有未解析的内容, 已忽略", origin.display());
    }

    let quantities = headers
        .into_iter()
        .zip(values)
        .map(|((name, unit, exception), values)| Quantity {
            name,
            unit,
            exception,
            values,
        })
        .collect();

    Ok(VarianceSpectrum::new(
        coordinates,
        locations,
        frequency_kind,
        frequencies,
        directions,
        quantities,
    )?
    .with_comments(comments))
}

/// 将谱写入文件
pub fn write_spectrum(path: &Path, spectrum: &VarianceSpectrum) -> WtResult<()> {
    let text = format_spectrum(spectrum);
    std::fs::write(path, text).map_err(|e| {
        WtError::io_with_source(format!("无法写入谱文件 {}", path.display()), e)
    })?;
    debug!("写出谱文件 {}", path.display());
    Ok(())
}

/// Fortran 风格的科学计数法，如 `0.1234E-01`
fn fortran_exp(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0.0000E+00".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let mut exp = abs.log10().floor() as i32 + 1;
    let mut digits = (abs / 10f64.powi(exp) * 1e4).round();
    if digits >= 1e4 {
        digits = (digits / 10.0).round();
        exp += 1;
    }
    let exp_sign = if exp < 0 { '-' } else { '+' };
    format!("{sign}0.{:04}E{exp_sign}{:02}", digits as u32, exp.abs())
}

/// 左侧取值、右侧注释的文件头行
fn keyed(out: &mut String, value: &str, comment: &str) {
    let _ = writeln!(out, "{value:<40}{comment}");
}

/// 将谱格式化为 SWAN 文本
pub fn format_spectrum(spectrum: &VarianceSpectrum) -> String {
    let mut out = String::new();
    keyed(&mut out, "SWAN   1", "Swan standard spectral file, version");
    if spectrum.comments().is_empty() {
        let _ = writeln!(out, "{DEFAULT_COMMENT}");
    }
    for comment in spectrum.comments() {
        let _ = writeln!(out, "{comment}");
    }

    match spectrum.coordinates() {
        CoordinateKind::Cartesian => keyed(&mut out, "LOCATIONS", "locations in x-y-space"),
        CoordinateKind::Spherical => keyed(&mut out, "LONLAT", "locations in spherical coordinates"),
    }
    keyed(&mut out, &format!("{:6}", spectrum.n_locations()), "number of locations");
    for loc in spectrum.locations() {
        let _ = writeln!(out, "{:>15.6} {:>15.6}", loc.x, loc.y);
    }

    match spectrum.frequency_kind() {
        FrequencyKind::Absolute => keyed(&mut out, "AFREQ", "absolute frequencies in Hz"),
        FrequencyKind::Relative => keyed(&mut out, "RFREQ", "relative frequencies in Hz"),
    }
    keyed(&mut out, &format!("{:6}", spectrum.n_frequencies()), "number of frequencies");
    for f in spectrum.frequencies() {
        let _ = writeln!(out, "{f:>10.4}");
    }

    if let Some(dirs) = spectrum.directions() {
        match dirs.convention {
            DirectionConvention::Nautical => {
                keyed(&mut out, "NDIR", "spectral nautical directions in degr")
            }
            DirectionConvention::Cartesian => {
                keyed(&mut out, "CDIR", "spectral Cartesian directions in degr")
            }
        }
        keyed(&mut out, &format!("{:6}", dirs.values.len()), "number of directions");
        for d in &dirs.values {
            let _ = writeln!(out, "{d:>10.4}");
        }
    }

    keyed(&mut out, "QUANT", "");
    keyed(&mut out, &format!("{:6}", spectrum.quantities().len()), "number of quantities in table");
    for q in spectrum.quantities() {
        keyed(&mut out, &q.name, "");
        keyed(&mut out, &q.unit, "unit");
        keyed(&mut out, &format!("   {}", fortran_exp(q.exception)), "exception value");
    }

    let n_freq = spectrum.n_frequencies();
    let n_dir = spectrum.n_directions();
    let block = n_freq * n_dir;

    for loc in 0..spectrum.n_locations() {
        let range = loc * block..(loc + 1) * block;
        let energy = &spectrum.energy().values[range.clone()];

        if energy.iter().all(|v| v.is_nan()) {
            let _ = writeln!(out, "NODATA");
            continue;
        }

        if spectrum.is_directional() {
            let max = energy
                .iter()
                .filter(|v| v.is_finite())
                .fold(0.0_f64, |m, v| m.max(v.abs()));
            if max == 0.0 {
                let _ = writeln!(out, "ZERO");
                continue;
            }
            let factor = max / MAX_SCALED_VALUE;
            let _ = writeln!(out, "FACTOR");
            let _ = writeln!(out, "    {}", fortran_exp(factor));
            for row in energy.chunks(n_dir) {
                let line: Vec<String> = row
                    .iter()
                    .map(|v| {
                        let scaled = if v.is_finite() { (v / factor).round() } else { 0.0 };
                        format!("{:6}", scaled as i64)
                    })
                    .collect();
                let _ = writeln!(out, "{}", line.join(""));
            }
        } else {
            let all_zero = spectrum
                .quantities()
                .iter()
                .all(|q| q.values[range.clone()].iter().all(|&v| v == 0.0));
            if all_zero {
                let _ = writeln!(out, "ZERO");
                continue;
            }
            let _ = writeln!(out, "LOCATION {:5}", loc + 1);
            for fi in 0..n_freq {
                let row: Vec<String> = spectrum
                    .quantities()
                    .iter()
                    .map(|q| {
                        let v = q.values[loc * block + fi];
                        let v = if v.is_nan() { q.exception } else { v };
                        format!("{:>13}", fortran_exp(v))
                    })
                    .collect();
                let _ = writeln!(out, "{}", row.join(""));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP1: &str = "\
SWAN   1                                Swan standard spectral file, version
$   Data produced by SWAN version 41.31
$   Project: OSK     ;  run number: 001
LOCATIONS                               locations in x-y-space
     2                                  number of locations
    53012.00   401873.00
    53052.00   401873.00
AFREQ                                   absolute frequencies in Hz
     3                                  number of frequencies
    0.1000
    0.2000
    0.3000
QUANT
     3                                  number of quantities in table
VaDens                                  variance densities in m2/Hz
m2/Hz                                   unit
   -0.9900E+02                          exception value
CDIR                                    average Cartesian direction in degr
degr                                    unit
   -0.9990E+03                          exception value
DSPRDEG                                 directional spreading
degr                                    unit
   -0.9000E+01                          exception value
LOCATION     1
   0.1000E+01   0.1800E+03   0.2500E+02
   0.2000E+01   0.1800E+03   0.2500E+02
   0.1000E+01  -0.9990E+03   0.2500E+02
NODATA
";

    const SP2: &str = "\
SWAN   1                                Swan standard spectral file, version
LOCATIONS                               locations in x-y-space
     1                                  number of locations
    100.00   200.00
AFREQ                                   absolute frequencies in Hz
     2                                  number of frequencies
    0.1000
    0.2000
NDIR                                    spectral nautical directions in degr
     4                                  number of directions
    0.0000
   90.0000
  180.0000
  270.0000
QUANT
     1                                  number of quantities in table
VaDens                                  variance densities in m2/Hz/degr
m2/Hz/degr                              unit
   -0.9900E+02                          exception value
FACTOR
    0.1000E-03
     100     100     100     100
     100     100     100     100
";

    #[test]
    fn test_parse_one_dimensional() {
        let spc = parse_spectrum(SP1, Path::new("test.sp1")).unwrap();
        assert_eq!(spc.n_locations(), 2);
        assert_eq!(spc.n_frequencies(), 3);
        assert!(!spc.is_directional());
        assert_eq!(spc.quantities().len(), 3);
        assert_eq!(spc.comments().len(), 2);
        assert_eq!(spc.locations()[1].x, 53052.0);
        assert_eq!(spc.location_energy(0).unwrap(), &[1.0, 2.0, 1.0]);
        // 异常值读作 NaN
        assert!(spc.quantities()[1].values[2].is_nan());
        assert!(spc.location_energy(1).unwrap().iter().all(|v| v.is_nan()));

        // m0 = 0.05×(1+2) + 0.05×(2+1) = 0.3
        let hs = spc.hm0();
        assert!((hs[0] - 4.0 * 0.3_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_parse_two_dimensional() {
        let spc = parse_spectrum(SP2, Path::new("test.sp2")).unwrap();
        assert!(spc.is_directional());
        assert_eq!(spc.n_directions(), 4);
        for v in spc.location_energy(0).unwrap() {
            assert!((v - 0.01).abs() < 1e-12);
        }
        // E(f) = 4 × 0.01 × 90 = 3.6, m0 = 0.36
        assert!((spc.hm0()[0] - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_time_dependent_rejected() {
        let text = "SWAN 1\nTIME\n1\nLOCATIONS\n1\n0 0\n";
        assert!(matches!(
            parse_spectrum(text, Path::new("t.sp1")),
            Err(WtError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            parse_spectrum("LOCATIONS\n1\n0 0\n", Path::new("t.sp1")),
            Err(WtError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let truncated: String = SP1.lines().take(26).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            parse_spectrum(&truncated, Path::new("t.sp1")),
            Err(WtError::Parse { .. })
        ));
    }

    #[test]
    fn test_fortran_exp() {
        assert_eq!(fortran_exp(0.0), "0.0000E+00");
        assert_eq!(fortran_exp(0.01234), "0.1234E-01");
        assert_eq!(fortran_exp(-99.0), "-0.9900E+02");
        assert_eq!(fortran_exp(1.0), "0.1000E+01");
        assert_eq!(fortran_exp(0.99999), "0.1000E+01");
    }

    #[test]
    fn test_written_file_reads_back() {
        let spc = parse_spectrum(SP1, Path::new("test.sp1")).unwrap();
        let text = format_spectrum(&spc);
        let back = parse_spectrum(&text, Path::new("out.sp1")).unwrap();

        assert_eq!(back.n_locations(), 2);
        assert_eq!(back.comments(), spc.comments());
        assert_eq!(back.location_energy(0).unwrap(), &[1.0, 2.0, 1.0]);
        assert!(back.quantities()[1].values[2].is_nan());
        assert!(back.location_energy(1).unwrap()[0].is_nan());
        assert!(text.contains("NODATA"));
    }

    #[test]
    fn test_written_directional_file_reads_back() {
        let spc = parse_spectrum(SP2, Path::new("test.sp2")).unwrap();
        let text = format_spectrum(&spc);
        assert!(text.contains("FACTOR"));
        let back = parse_spectrum(&text, Path::new("out.sp2")).unwrap();
        for (a, b) in spc
            .location_energy(0)
            .unwrap()
            .iter()
            .zip(back.location_energy(0).unwrap())
        {
            assert!((a - b).abs() / a < 1e-3);
        }
    }
}
