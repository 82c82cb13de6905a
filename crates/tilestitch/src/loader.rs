//! Directory loading
//!
//! ```text
//! <dir>/tileset.json       optional tileset record
//! <dir>/**/tile.json       one tile record per directory
//! <dir>/**/tile.png        that tile's image
//! ```

use crate::{BuildError, TilesetBuilder};
use std::path::{Path, PathBuf};
use tilestitch_atlas::SourceImage;
use tilestitch_core::{TileRecord, Tileset, TilesetRecord};
use walkdir::WalkDir;

pub const TILESET_FILE: &str = "tileset.json";
pub const TILE_FILE: &str = "tile.json";
pub const IMAGE_FILE: &str = "tile.png";

impl TilesetBuilder {
    /// Read a tile directory into a builder without packing it
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let root = path.as_ref();
        let record = load_tileset_record(root)?;
        let mut builder = TilesetBuilder::new(record);

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            match &*file_name {
                TILE_FILE => {
                    let (record, image) = load_tile(entry.path())?;
                    tracing::debug!(tile = %record.name, path = %entry.path().display(), "loaded tile");
                    builder.add_tile(record, image);
                }
                IMAGE_FILE => {
                    if !entry.path().with_file_name(TILE_FILE).is_file() {
                        tracing::warn!(
                            path = %entry.path().display(),
                            "skipping image without a {}",
                            TILE_FILE
                        );
                    }
                }
                TILESET_FILE if entry.depth() == 1 => {}
                _ => {
                    tracing::warn!(path = %entry.path().display(), "skipping non-tile file");
                }
            }
        }

        tracing::info!(
            path = %root.display(),
            tiles = builder.tile_count(),
            "loaded tile directory"
        );
        Ok(builder)
    }
}

/// Load and build a tile directory in one step
pub fn build_directory(path: impl AsRef<Path>) -> Result<Tileset, BuildError> {
    TilesetBuilder::from_directory(path)?.build()
}

fn read(path: &Path) -> Result<Vec<u8>, BuildError> {
    std::fs::read(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, BuildError> {
    let bytes = read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| BuildError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_tileset_record(root: &Path) -> Result<TilesetRecord, BuildError> {
    let path = root.join(TILESET_FILE);
    if path.is_file() {
        parse_json(&path)
    } else {
        Ok(TilesetRecord::default())
    }
}

fn load_tile(record_path: &Path) -> Result<(TileRecord, SourceImage), BuildError> {
    let record: TileRecord = parse_json(record_path)?;

    let image_path = record_path
        .parent()
        .map(|dir| dir.join(IMAGE_FILE))
        .unwrap_or_else(|| PathBuf::from(IMAGE_FILE));
    if !image_path.is_file() {
        return Err(BuildError::MissingImage(record_path.to_path_buf()));
    }

    let image = image::open(&image_path).map_err(|source| BuildError::Image {
        path: image_path.clone(),
        source,
    })?;
    Ok((record, SourceImage::from_dynamic(image)))
}
