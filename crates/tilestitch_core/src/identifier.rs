//! Namespaced identifiers

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `namespace:path` name used as the key for tiles, categories and autotile sets
///
/// The namespace must be non-empty and contain no `:`; the path must be
/// non-empty and may contain anything, including further colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    full: String,
    split: usize,
}

impl Identifier {
    /// Build an identifier from its two halves
    pub fn new(namespace: &str, path: &str) -> Result<Self, ConfigError> {
        format!("{namespace}:{path}").parse()
    }

    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The default empty tile, `base:tile/empty`
    pub fn empty_tile() -> Self {
        Self {
            full: crate::EMPTY_TILE.to_string(),
            split: 4,
        }
    }

    pub(crate) fn default_tileset() -> Self {
        Self {
            full: "base:tileset/default".to_string(),
            split: 4,
        }
    }
}

impl FromStr for Identifier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.find(':') {
            Some(split) if split > 0 && split + 1 < s.len() => Ok(Self {
                full: s.to_string(),
                split,
            }),
            _ => Err(ConfigError::InvalidIdentifier(s.to_string())),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for Identifier {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.full
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
