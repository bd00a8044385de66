// crates/wt_core/src/table.rs

//! 表格数据
//!
//! SWAN 表格输出的内存表示：按列存储，每行对应一个输出位置，
//! 行顺序与谱文件的位置顺序一致。

use wt_foundation::{ensure, WtError, WtResult};

/// 按列存储的数值表
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwanTable {
    names: Vec<String>,
    units: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SwanTable {
    /// 由列名、单位和按行排列的数据创建表
    ///
    /// `units` 可以为空；非空时长度必须与列名一致。
    pub fn from_rows(
        names: Vec<String>,
        units: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> WtResult<Self> {
        ensure!(!names.is_empty(), WtError::malformed("table", "缺少列名"));
        if !units.is_empty() {
            WtError::check_count("table units", names.len(), units.len())?;
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            WtError::check_count("table row", names.len(), row.len())?;
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Ok(Self {
            names,
            units,
            columns,
        })
    }

    /// 列名
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 单位
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// 行数（位置数）
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// 是否包含某列（不区分大小写）
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// 按名称取列（不区分大小写）
    pub fn column(&self, name: &str) -> WtResult<&[f64]> {
        self.position(name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| {
                WtError::malformed("table", format!("缺少列 {name}，现有列: {:?}", self.names))
            })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}
