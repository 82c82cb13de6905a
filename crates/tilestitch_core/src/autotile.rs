//! Autotile membership types

use crate::{Identifier, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A family of tiles that visually connect to each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutotileSet {
    pub identifier: Identifier,
    /// Names of every tile that counts as part of this family
    pub members: BTreeSet<Identifier>,
    /// Omni sets (fences, pipes) blend against any solid tile
    #[serde(default)]
    pub omni: bool,
}

impl AutotileSet {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            members: BTreeSet::new(),
            omni: false,
        }
    }

    pub fn contains(&self, tile: &Identifier) -> bool {
        self.members.contains(tile)
    }
}

/// Runtime marching data for one blend-aware tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarchableInfo {
    pub autotile_set: Arc<AutotileSet>,
    /// First cell of the tile's block; variant `n` lives at `corner + n`
    pub corner: TileId,
    /// Each variant has an upper cell (see `Tileset::upper_of`)
    pub tall: bool,
    /// Marched with eight neighbors instead of four
    pub eight_way: bool,
}

impl MarchableInfo {
    pub fn set_identifier(&self) -> &Identifier {
        &self.autotile_set.identifier
    }
}
