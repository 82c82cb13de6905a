//! Source image shape classes

use crate::TILE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed pixel footprint of a source tile image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeClass {
    /// One 16x16 cell
    Single,
    /// One name, two stacked cells (16x32, upper half on top)
    TallSingle,
    /// 4x4 autotile block (64x64)
    ShortAutotile,
    /// 4x4 autotile block where every variant is two stacked cells (64x128)
    TallAutotile,
    /// 48-cell autotile block laid out 8 columns by 6 rows (128x96)
    WideAutotile48,
}

impl ShapeClass {
    pub const ALL: [ShapeClass; 5] = [
        ShapeClass::Single,
        ShapeClass::TallSingle,
        ShapeClass::ShortAutotile,
        ShapeClass::TallAutotile,
        ShapeClass::WideAutotile48,
    ];

    /// Number of atlas cells (and tile IDs) this shape occupies
    pub fn cell_count(&self) -> u32 {
        match self {
            ShapeClass::Single => 1,
            ShapeClass::TallSingle => 2,
            ShapeClass::ShortAutotile => 16,
            ShapeClass::TallAutotile => 32,
            ShapeClass::WideAutotile48 => 48,
        }
    }

    /// Source image size in cells (columns, rows)
    pub fn grid_size(&self) -> (u32, u32) {
        match self {
            ShapeClass::Single => (1, 1),
            ShapeClass::TallSingle => (1, 2),
            ShapeClass::ShortAutotile => (4, 4),
            ShapeClass::TallAutotile => (4, 8),
            ShapeClass::WideAutotile48 => (8, 6),
        }
    }

    /// Source image size in pixels (width, height)
    pub fn pixel_size(&self) -> (u32, u32) {
        let (columns, rows) = self.grid_size();
        (columns * TILE_SIZE, rows * TILE_SIZE)
    }

    /// Infer the shape from an image size, if it matches exactly one shape
    pub fn from_pixel_size(width: u32, height: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.pixel_size() == (width, height))
    }

    /// Whether this shape is an autotile block that gets marchable info
    pub fn is_autotile(&self) -> bool {
        matches!(
            self,
            ShapeClass::ShortAutotile | ShapeClass::TallAutotile | ShapeClass::WideAutotile48
        )
    }

    /// Whether each variant has a linked upper cell
    pub fn is_tall(&self) -> bool {
        matches!(self, ShapeClass::TallSingle | ShapeClass::TallAutotile)
    }

    /// Whether this block is marched with all eight neighbors
    pub fn is_eight_way(&self) -> bool {
        matches!(self, ShapeClass::WideAutotile48)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeClass::Single => "single",
            ShapeClass::TallSingle => "tall_single",
            ShapeClass::ShortAutotile => "short_autotile",
            ShapeClass::TallAutotile => "tall_autotile",
            ShapeClass::WideAutotile48 => "wide_autotile48",
        }
    }
}

impl Default for ShapeClass {
    fn default() -> Self {
        ShapeClass::Single
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
