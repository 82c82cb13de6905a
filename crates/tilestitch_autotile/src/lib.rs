//! Marching-squares autotile selection
//!
//! This crate picks the edge/corner variant of a blend-aware tile from its
//! neighbors, and resolves declarative autotile membership rules.
//!
//! # Features
//! - 8-way marching over 48-cell blocks (47 blob variants + "nothing")
//! - 4-way marching over 16-cell blocks
//! - Eager category expansion for autotile membership
//! - Runtime variant selection against a built `Tileset`
//!
//! # Example
//!
//! ```rust,ignore
//! use tilestitch_autotile::{march8, MarchTileset};
//!
//! // Water to the north and west only
//! let variant = march8(|dx, dy| matches!((dx, dy), (0, -1) | (-1, 0)));
//!
//! // Or let the tileset decide family membership
//! let marched = tileset.march_tile(center_id, |dx, dy| world.tile_at(x + dx, y + dy));
//! ```

pub mod catalog;
pub mod march;
pub mod select;

pub use catalog::{AutotileCatalog, FrozenCatalog};
pub use march::{
    bitmask4, bitmask8, march4, march4_cell, march8, march8_cell, optimize_bitmask, variant4,
    variant8,
};
pub use select::MarchTileset;

// Re-export tilestitch_core
pub use tilestitch_core;
