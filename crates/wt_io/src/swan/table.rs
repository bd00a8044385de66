// crates/wt_io/src/swan/table.rs

//! SWAN 表格输出读取
//!
//! 带文件头（`HEADER` 选项）的 SWAN 表格：
//!
//! ```text
//! %
//! % Run:001  Table:POINTS  SWAN version:41.31
//! %
//! %       Xp            Yp            Hsig          Watlev
//! %       [m]           [m]           [m]           [m]
//! %
//!     53012.00     401873.00        1.2345        0.5000
//! ```
//!
//! 列名行取最后一个词数等于数据列数、且不是单位行的 `%` 行。

use std::path::Path;

use tracing::info;
use wt_core::SwanTable;
use wt_foundation::{WtError, WtResult};

/// 从文件读取 SWAN 表格
///
/// # 错误
///
/// - 文件不存在：`NotFound`
/// - 数据行无法解析或列数不一致：`Parse`
/// - 缺少列名行：`Malformed`
pub fn read_table(path: &Path) -> WtResult<SwanTable> {
    if !path.exists() {
        return Err(WtError::not_found(path));
    }
    let text = std::fs::read_to_string(path).map_err(|e| {
        WtError::io_with_source(format!("无法读取表格文件 {}", path.display()), e)
    })?;
    let table = parse_table(&text, path)?;
    info!(
        "读取表格文件 {}: {} 行, 列 {:?}",
        path.display(),
        table.n_rows(),
        table.names()
    );
    Ok(table)
}

/// 从字符串解析 SWAN 表格，`origin` 仅用于错误信息
pub fn parse_table(text: &str, origin: &Path) -> WtResult<SwanTable> {
    let mut header: Vec<Vec<&str>> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('%') {
            header.push(rest.split_whitespace().collect());
            continue;
        }

        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    WtError::parse(origin, line_num + 1, format!("无法解析数值 '{token}'"))
                })
            })
            .collect::<WtResult<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(WtError::parse(
                    origin,
                    line_num + 1,
                    format!("列数不一致: 期望 {}, 实际 {}", first.len(), row.len()),
                ));
            }
        }
        rows.push(row);
    }

    let source_name = origin.display().to_string();
    let n_cols = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| WtError::malformed(source_name.as_str(), "表格没有数据行"))?;

    let is_unit_line = |tokens: &[&str]| tokens.iter().all(|t| t.starts_with('['));
    let is_name_line = |tokens: &[&str]| {
        tokens.len() == n_cols && !is_unit_line(tokens) && !tokens.iter().any(|t| t.contains(':'))
    };

    let name_pos = header
        .iter()
        .rposition(|tokens| is_name_line(tokens.as_slice()))
        .ok_or_else(|| {
            WtError::malformed(source_name.as_str(), "缺少列名行（表格是否以 NOHEADER 输出？）")
        })?;

    let names: Vec<String> = header[name_pos].iter().map(|s| s.to_string()).collect();
    let units: Vec<String> = header
        .get(name_pos + 1)
        .filter(|tokens| tokens.len() == n_cols && is_unit_line(tokens.as_slice()))
        .map(|tokens| tokens.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    SwanTable::from_rows(names, units, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: &str = "\
%
%
% Run:001  Table:POINTS           SWAN version:41.31
%
%       Xp            Yp            Hsig          Watlev
%       [m]           [m]           [m]           [m]
%
    53012.00     401873.00        1.2345        0.5000
    53052.00     401873.00        1.1000        0.5200
";

    #[test]
    fn test_parse_table() {
        let t = parse_table(TAB, Path::new("test.tab")).unwrap();
        assert_eq!(t.names(), &["Xp", "Yp", "Hsig", "Watlev"]);
        assert_eq!(t.units().len(), 4);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.column("Watlev").unwrap(), &[0.5, 0.52]);
        assert_eq!(t.column("Xp").unwrap(), &[53012.0, 53052.0]);
    }

    #[test]
    fn test_noheader_table_is_malformed() {
        let text = "    1.0   2.0   0.5\n    3.0   4.0   0.6\n";
        assert!(matches!(
            parse_table(text, Path::new("t.tab")),
            Err(WtError::Malformed { .. })
        ));
    }

    #[test]
    fn test_ragged_row() {
        let text = "%  Xp  Yp  Watlev\n 1.0 2.0 0.5\n 3.0 4.0\n";
        assert!(matches!(
            parse_table(text, Path::new("t.tab")),
            Err(WtError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_bad_number() {
        let text = "%  Xp  Yp  Watlev\n 1.0 abc 0.5\n";
        assert!(matches!(
            parse_table(text, Path::new("t.tab")),
            Err(WtError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_table(Path::new("/nonexistent/run001.tab")),
            Err(WtError::NotFound { .. })
        ));
    }
}
