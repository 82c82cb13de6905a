use std::path::PathBuf;
use thiserror::Error;
use tilestitch_core::ConfigError;

/// Error type for tileset build failures
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk tile directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Tile record {0} has no tile.png next to it")]
    MissingImage(PathBuf),
    #[error("Failed to serialize records for hashing: {0}")]
    Hash(#[from] serde_json::Error),
}
