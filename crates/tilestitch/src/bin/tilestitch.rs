//! Stitch a tile directory into an atlas PNG and a tables JSON file
//!
//! Run with: tilestitch [config.toml]
//! The config path defaults to `tilestitch.toml` in the working directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tilestitch::{BuildError, StrategyKind, TilesetBuilder};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "tilestitch.toml";

/// Tool configuration, deserialized from TOML
#[derive(Debug, Clone, Deserialize)]
struct ToolConfig {
    /// Tile directory to stitch
    source: PathBuf,
    /// Output atlas PNG
    atlas: PathBuf,
    /// Output tables JSON
    tables: PathBuf,
    #[serde(default)]
    strategy: StrategyKind,
    /// Used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
enum ToolError {
    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Failed to encode atlas: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to serialize tables: {0}")]
    Tables(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ToolConfig {
    fn load(path: &Path) -> Result<Self, ToolError> {
        let content = std::fs::read_to_string(path).map_err(|source| ToolError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ToolError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn init_logging(config: &ToolConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ToolError> {
    let write_err = |source| ToolError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}

fn run(config: &ToolConfig) -> Result<(), ToolError> {
    let tileset = TilesetBuilder::from_directory(&config.source)?
        .with_strategy(config.strategy)
        .build()?;

    let png = tileset.atlas().encode_png()?;
    write_output(&config.atlas, &png)?;

    let tables = serde_json::to_vec_pretty(&tileset.tables())?;
    write_output(&config.tables, &tables)?;

    tracing::info!(
        atlas = %config.atlas.display(),
        tables = %config.tables.display(),
        hash = %tileset.content_hash(),
        "wrote tileset"
    );
    Ok(())
}

fn main() -> ExitCode {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let config = match ToolConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("tilestitch: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
