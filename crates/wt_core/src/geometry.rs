// crates/wt_core/src/geometry.rs

//! 闸门几何
//!
//! 每个闸门（挡潮闸的一个开口）的结构几何：抛石基床、横梁、路面。
//! 所有高程使用与水力边界条件相同的基准面。
//!
//! ```text
//!   road.top    ┌──────────┐
//!               │   路面   │
//!   road.bottom └──────────┘
//!   beam.top    ┌──────────┐
//!               │   横梁   │
//!   beam.bottom └──────────┘
//!                  (闸门)
//!   ─────────── ▲ rmb.height 抛石基床顶
//!               │
//!               ▼ rmb.depth
//! ```
//!
//! 几何数据一次加载，整个运行期间只读共享。

use serde::{Deserialize, Serialize};
use wt_foundation::{ensure, WtError, WtResult};

/// 闸门高度不变量的容差 [m]
pub const DOOR_HEIGHT_TOLERANCE: f64 = 1e-6;

/// 抛石基床
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RubbleMound {
    /// 基床顶高于床面的高度 [m]
    pub height: f64,
    /// 基准面以下深度 [m]
    pub depth: f64,
}

/// 横梁或路面等水平构件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// 底高程 [m]
    pub bottom: f64,
    /// 顶高程 [m]
    pub top: f64,
}

impl Element {
    /// 构件厚度
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.top - self.bottom
    }

    /// 水面 `crest` 下被淹没的构件厚度，不超过构件自身厚度
    #[inline]
    pub fn submerged(&self, crest: f64) -> f64 {
        if crest > self.bottom {
            (crest - self.bottom).min(self.thickness())
        } else {
            0.0
        }
    }
}

/// 闸门门叶（可选描述）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorLeaf {
    /// 门叶高度 [m]
    pub height: f64,
}

/// 单个闸门的几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorGeometry {
    /// x 坐标
    pub x: f64,
    /// y 坐标
    pub y: f64,
    /// 闸门名称（用于输出文件命名）
    pub name: String,
    /// 抛石基床
    pub rmb: RubbleMound,
    /// 横梁
    pub beam: Element,
    /// 路面
    pub road: Element,
    /// 门叶，存在时校验 `height == rmb.depth + beam.bottom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door: Option<DoorLeaf>,
}

impl DoorGeometry {
    /// 取整后的坐标，用于与水力条件配对
    #[inline]
    pub fn rounded_position(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }

    /// 关闭时门叶的附加阻挡高度
    ///
    /// 门叶高度按构造等于 `rmb.depth + beam.bottom`。
    #[inline]
    pub fn closed_door_extent(&self) -> f64 {
        self.rmb.depth + self.beam.bottom
    }

    /// 校验物理不变量
    pub fn validate(&self) -> WtResult<()> {
        let label = if self.name.is_empty() {
            format!("({}, {})", self.x, self.y)
        } else {
            self.name.clone()
        };

        ensure!(
            !self.name.trim().is_empty(),
            WtError::malformed(label.as_str(), "闸门名称为空")
        );

        let values = [
            ("x", self.x),
            ("y", self.y),
            ("rmb.height", self.rmb.height),
            ("rmb.depth", self.rmb.depth),
            ("beam.bottom", self.beam.bottom),
            ("beam.top", self.beam.top),
            ("road.bottom", self.road.bottom),
            ("road.top", self.road.top),
        ];
        for (field, value) in values {
            ensure!(
                value.is_finite(),
                WtError::malformed(label.as_str(), format!("{field} 不是有限数值: {value}"))
            );
        }

        ensure!(
            self.rmb.height >= 0.0,
            WtError::malformed(label.as_str(), format!("rmb.height 不能为负: {}", self.rmb.height))
        );
        ensure!(
            self.beam.bottom <= self.beam.top,
            WtError::malformed(
                label.as_str(),
                format!("beam.bottom ({}) 高于 beam.top ({})", self.beam.bottom, self.beam.top)
            )
        );
        ensure!(
            self.road.bottom <= self.road.top,
            WtError::malformed(
                label.as_str(),
                format!("road.bottom ({}) 高于 road.top ({})", self.road.bottom, self.road.top)
            )
        );

        if let Some(door) = &self.door {
            let expected = self.closed_door_extent();
            ensure!(
                (door.height - expected).abs() <= DOOR_HEIGHT_TOLERANCE,
                WtError::malformed(
                    label.as_str(),
                    format!(
                        "door.height ({}) 不等于 rmb.depth + beam.bottom ({})",
                        door.height, expected
                    )
                )
            );
        }

        Ok(())
    }
}
