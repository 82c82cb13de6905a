use crate::{Identifier, ShapeClass};
use thiserror::Error;

/// Malformed or inconsistent tileset input
///
/// Always fatal to a build: a half-built atlas would shift the ID of every
/// tile placed after the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid identifier '{0}': expected 'namespace:path'")]
    InvalidIdentifier(String),
    #[error("Invalid autotile member '{0}': expected a tile name or 'category:<namespace:path>'")]
    InvalidMemberSpec(String),
    #[error(
        "Tile '{tile}' is declared {shape} ({expected_width}x{expected_height} px) but its image is {width}x{height}"
    )]
    DimensionMismatch {
        tile: Identifier,
        shape: ShapeClass,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
    #[error("Tile '{tile}' has an image size ({width}x{height}) that matches no shape")]
    UnrecognizedShape {
        tile: Identifier,
        width: u32,
        height: u32,
    },
    #[error("Tile '{tile}' has {channels} channels, expected 3 or 4")]
    UnsupportedChannels { tile: Identifier, channels: u8 },
    #[error("Tile '{tile}' pixel buffer is {actual} bytes, expected {expected}")]
    PixelBufferSize {
        tile: Identifier,
        expected: usize,
        actual: usize,
    },
    #[error("Duplicate tile '{0}'")]
    DuplicateTile(Identifier),
    #[error("Unknown category '{category}' referenced by {referenced_by}")]
    UnknownCategory {
        category: Identifier,
        referenced_by: String,
    },
    #[error("Unknown autotile set '{set}' referenced by {referenced_by}")]
    UnknownAutotileSet {
        set: Identifier,
        referenced_by: String,
    },
    #[error("Unknown tile '{tile}' referenced by {referenced_by}")]
    UnknownTile {
        tile: Identifier,
        referenced_by: String,
    },
    #[error("Empty tile '{0}' cannot belong to a category or autotile set")]
    EmptyTileMembership(Identifier),
    #[error("Empty tile '{tile}' must be a single 16x16 tile, found {shape}")]
    EmptyTileShape { tile: Identifier, shape: ShapeClass },
    #[error("Tile '{tile}' is a {shape} block but belongs to no autotile set")]
    MissingAutotileSet { tile: Identifier, shape: ShapeClass },
    #[error("Combo tile '{tile}' must be {expected}, found {actual}")]
    ComboShape {
        tile: Identifier,
        expected: ShapeClass,
        actual: ShapeClass,
    },
    #[error("Tile '{0}' appears in more than one combo")]
    ComboConflict(Identifier),
    #[error("The {strategy} packer does not support {shape} tile '{tile}'")]
    UnsupportedShape {
        strategy: &'static str,
        tile: Identifier,
        shape: ShapeClass,
    },
    #[error("The {strategy} packer does not support guaranteed combos")]
    CombosUnsupported { strategy: &'static str },
}
