//! Core data structures for tilestitch
//!
//! This crate provides the fundamental types shared by the packer, the
//! autotile catalog and the builder:
//! - `Identifier` - A namespaced `namespace:path` name
//! - `ShapeClass` - The pixel footprint of a source tile image
//! - `TileRecord` / `TilesetRecord` - Already-parsed tile metadata
//! - `Atlas` - The packed RGBA texture
//! - `AutotileSet` / `MarchableInfo` - Autotile membership
//! - `Tileset` - The immutable lookup tables produced by a build

mod atlas;
mod autotile;
mod error;
mod identifier;
mod record;
mod shape;
mod tileset;

pub use atlas::Atlas;
pub use autotile::{AutotileSet, MarchableInfo};
pub use error::ConfigError;
pub use identifier::Identifier;
pub use record::{MemberSpec, TileRecord, TilesetRecord};
pub use shape::ShapeClass;
pub use tileset::{
    AutotileTable, ContentHash, MarchableTable, TileKey, Tileset, TilesetParts, TilesetTables,
};

/// Numeric tile ID, dense and zero-based. ID 0 is always the empty tile.
pub type TileId = u32;

/// Side length of one atlas cell in pixels.
pub const TILE_SIZE: u32 = 16;

/// Name of the tile that always receives ID 0 unless a tileset overrides it.
pub const EMPTY_TILE: &str = "base:tile/empty";

/// The reserved empty tile ID.
pub const EMPTY_ID: TileId = 0;
