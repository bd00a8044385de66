// crates/wt_io/src/geometry.rs

//! 闸门几何描述文件
//!
//! JSON 数组，每个元素描述一个闸门：
//!
//! ```json
//! [
//!   {
//!     "x": 53012.0, "y": 401873.0, "name": "Roompot-01",
//!     "rmb":  {"height": 4.5, "depth": 30.0},
//!     "beam": {"bottom": -4.0, "top": 1.0},
//!     "road": {"bottom": 5.8, "top": 8.3}
//!   }
//! ]
//! ```
//!
//! 数组顺序即闸门顺序，与谱文件的位置顺序按索引配对。

use std::collections::HashMap;
use std::path::Path;

use tracing::info;
use wt_core::DoorGeometry;
use wt_foundation::{ensure, WtError, WtResult};

use crate::naming;

/// 从文件加载闸门几何
///
/// # 错误
///
/// - 文件不存在：`NotFound`
/// - 字段缺失、非数值或违反几何不变量：`Malformed`
/// - 两个闸门名称对应同一个输出文件名：`Malformed`
pub fn load_geometry(path: &Path) -> WtResult<Vec<DoorGeometry>> {
    if !path.exists() {
        return Err(WtError::not_found(path));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        WtError::io_with_source(format!("无法读取几何文件 {}", path.display()), e)
    })?;

    let doors = parse_geometry(&content, &path.display().to_string())?;
    info!("加载闸门几何: {} 个闸门 ({})", doors.len(), path.display());
    Ok(doors)
}

/// 从 JSON 字符串解析闸门几何
pub fn parse_geometry(content: &str, source_name: &str) -> WtResult<Vec<DoorGeometry>> {
    let doors: Vec<DoorGeometry> = serde_json::from_str(content)
        .map_err(|e| WtError::malformed(source_name, e.to_string()))?;

    ensure!(
        !doors.is_empty(),
        WtError::malformed(source_name, "几何文件不包含任何闸门")
    );

    // 闸门名称决定输出文件名，转换后必须互不相同
    {
        let mut stems: HashMap<String, &str> = HashMap::with_capacity(doors.len());
        for door in &doors {
            door.validate()?;
            let stem = naming::sanitize_file_stem(&door.name).to_lowercase();
            if let Some(other) = stems.insert(stem, door.name.as_str()) {
                return Err(WtError::malformed(
                    source_name,
                    format!("闸门名称 '{}' 与 '{}' 对应同一个输出文件", door.name, other),
                ));
            }
        }
    }

    Ok(doors)
}
