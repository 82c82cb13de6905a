//! Texture atlas packing for tilestitch
//!
//! Places heterogeneous tile images (singles, tall singles and autotile
//! blocks) into one square RGBA atlas and assigns every cell a dense tile ID.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilestitch_atlas::{GreedyPacker, PackItem, PackRequest, PackStrategy, SourceImage};
//!
//! let request = PackRequest::new(vec![PackItem::new(
//!     "base:tile/grass".parse()?,
//!     ShapeClass::Single,
//!     SourceImage::filled(16, 16, [0, 255, 0, 255]),
//! )]);
//! let packing = GreedyPacker.pack(&request)?;
//! assert_eq!(packing.placements[0].base, 1);
//! ```

mod greedy;
mod legacy;
mod request;
mod source;

pub use greedy::GreedyPacker;
pub use legacy::LegacyPacker;
pub use request::{
    columns_for_cells, PackItem, PackRequest, Packing, Placement, MIN_COLUMNS, SLAB_CELLS,
};
pub use source::SourceImage;

use serde::{Deserialize, Serialize};
use tilestitch_core::ConfigError;

/// A way of laying tiles out in an atlas
pub trait PackStrategy {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Place every item; fails without producing a partial atlas
    fn pack(&self, request: &PackRequest) -> Result<Packing, ConfigError>;
}

/// Selects a packer from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Greedy,
    Legacy,
}

impl StrategyKind {
    pub fn packer(self) -> Box<dyn PackStrategy + Send + Sync> {
        match self {
            StrategyKind::Greedy => Box::new(GreedyPacker),
            StrategyKind::Legacy => Box::new(LegacyPacker),
        }
    }
}

// Re-export tilestitch_core
pub use tilestitch_core;
