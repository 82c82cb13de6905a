//! tilestitch - tile atlas stitching with marching-squares autotiles
//!
//! Turns a directory of individually authored tile images into one packed
//! texture atlas and an immutable [`Tileset`] answering name/ID, category,
//! flag and autotile queries.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tilestitch::prelude::*;
//!
//! let tileset = build_directory("assets/tiles")?;
//! let water = tileset.id_of(&"base:tile/water".parse()?).unwrap();
//!
//! // Pick the edge/corner cell from the surrounding tiles
//! let cell = tileset.march_tile(water, |dx, dy| world.tile_at(x + dx, y + dy));
//! ```
//!
//! # Crates
//!
//! - `tilestitch_core` - Identifiers, records, the atlas buffer and `Tileset`
//! - `tilestitch_autotile` - Marching squares and the autotile catalog
//! - `tilestitch_atlas` - Packing strategies

mod builder;
mod error;
pub mod hash;
mod loader;

pub use builder::TilesetBuilder;
pub use error::BuildError;
pub use loader::{build_directory, IMAGE_FILE, TILESET_FILE, TILE_FILE};

// Re-export the member crates
pub use tilestitch_atlas;
pub use tilestitch_autotile;
pub use tilestitch_core;

pub use tilestitch_atlas::{PackStrategy, SourceImage, StrategyKind};
pub use tilestitch_autotile::MarchTileset;
pub use tilestitch_core::{
    Atlas, ConfigError, ContentHash, Identifier, ShapeClass, TileId, TileRecord, Tileset,
    TilesetRecord, TilesetTables,
};

pub mod prelude {
    pub use crate::{build_directory, BuildError, TilesetBuilder};
    pub use tilestitch_atlas::{SourceImage, StrategyKind};
    pub use tilestitch_autotile::{march4, march8, MarchTileset};
    pub use tilestitch_core::{Identifier, ShapeClass, TileId, Tileset, EMPTY_ID};
}
