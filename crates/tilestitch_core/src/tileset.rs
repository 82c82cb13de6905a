//! The immutable tileset produced by a build

use crate::{Atlas, AutotileSet, Identifier, MarchableInfo, TileId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// SHA-256 digest over every input of a build, used as a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A tile addressed either by numeric ID or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKey<'a> {
    Id(TileId),
    Name(&'a Identifier),
}

impl From<TileId> for TileKey<'_> {
    fn from(id: TileId) -> Self {
        TileKey::Id(id)
    }
}

impl<'a> From<&'a Identifier> for TileKey<'a> {
    fn from(name: &'a Identifier) -> Self {
        TileKey::Name(name)
    }
}

/// Everything a builder hands over to freeze into a `Tileset`
#[derive(Debug)]
pub struct TilesetParts {
    pub name: Identifier,
    pub empty: Identifier,
    /// Tile name -> base (lower) ID
    pub ids: HashMap<Identifier, TileId>,
    /// ID -> tile name, one entry per atlas cell in use
    pub names: Vec<Option<Identifier>>,
    pub solid: HashSet<Identifier>,
    pub land: HashSet<Identifier>,
    pub bright: HashSet<Identifier>,
    /// Category -> member tile names
    pub categories: BTreeMap<Identifier, BTreeSet<Identifier>>,
    pub autotile_sets: BTreeMap<Identifier, Arc<AutotileSet>>,
    pub marchable: HashMap<Identifier, MarchableInfo>,
    /// Lower ID -> upper ID for tall shapes
    pub uppers: BTreeMap<TileId, TileId>,
    pub stack_items: HashMap<Identifier, Identifier>,
    pub hash: ContentHash,
    pub atlas: Atlas,
}

/// Immutable lookup tables over a packed atlas
///
/// Safe to share between threads; a rebuild produces a new instance.
#[derive(Debug)]
pub struct Tileset {
    name: Identifier,
    empty: Identifier,
    ids: HashMap<Identifier, TileId>,
    names: Vec<Option<Identifier>>,
    solid: HashSet<Identifier>,
    land: HashSet<Identifier>,
    bright: HashSet<Identifier>,
    categories: BTreeMap<Identifier, BTreeSet<Identifier>>,
    tile_categories: HashMap<Identifier, BTreeSet<Identifier>>,
    autotile_sets: BTreeMap<Identifier, Arc<AutotileSet>>,
    tile_autotiles: HashMap<Identifier, Arc<AutotileSet>>,
    marchable: HashMap<Identifier, Arc<MarchableInfo>>,
    marchable_cache: Box<[OnceLock<Option<Arc<MarchableInfo>>>]>,
    uppers: BTreeMap<TileId, TileId>,
    stack_items: HashMap<Identifier, Identifier>,
    hash: ContentHash,
    atlas: Atlas,
}

impl Tileset {
    /// Freeze builder output, deriving the reverse lookup tables
    pub fn from_parts(parts: TilesetParts) -> Self {
        let mut tile_categories: HashMap<Identifier, BTreeSet<Identifier>> = HashMap::new();
        for (category, tiles) in &parts.categories {
            for tile in tiles {
                tile_categories
                    .entry(tile.clone())
                    .or_default()
                    .insert(category.clone());
            }
        }

        let mut tile_autotiles = HashMap::new();
        for set in parts.autotile_sets.values() {
            for member in &set.members {
                tile_autotiles.insert(member.clone(), Arc::clone(set));
            }
        }

        let marchable = parts
            .marchable
            .into_iter()
            .map(|(name, info)| (name, Arc::new(info)))
            .collect();

        let marchable_cache = (0..parts.names.len()).map(|_| OnceLock::new()).collect();

        Self {
            name: parts.name,
            empty: parts.empty,
            ids: parts.ids,
            names: parts.names,
            solid: parts.solid,
            land: parts.land,
            bright: parts.bright,
            categories: parts.categories,
            tile_categories,
            autotile_sets: parts.autotile_sets,
            tile_autotiles,
            marchable,
            marchable_cache,
            uppers: parts.uppers,
            stack_items: parts.stack_items,
            hash: parts.hash,
            atlas: parts.atlas,
        }
    }

    /// Identifier of this tileset
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    /// Name of the tile with ID 0
    pub fn empty_tile(&self) -> &Identifier {
        &self.empty
    }

    /// Number of IDs in use (highest assigned ID + 1)
    pub fn tile_count(&self) -> u32 {
        self.names.len() as u32
    }

    /// Base ID of a tile; for tall tiles this is the lower cell
    pub fn id_of(&self, name: &Identifier) -> Option<TileId> {
        self.ids.get(name).copied()
    }

    /// Tile name owning an ID; every cell of a block maps back to its tile
    pub fn name_of(&self, id: TileId) -> Option<&Identifier> {
        self.names.get(id as usize)?.as_ref()
    }

    /// Iterate over every tile name and its base ID
    pub fn tiles(&self) -> impl Iterator<Item = (&Identifier, TileId)> {
        self.ids.iter().map(|(name, &id)| (name, id))
    }

    fn resolve<'a>(&'a self, key: TileKey<'a>) -> Option<&'a Identifier> {
        match key {
            TileKey::Id(id) => self.name_of(id),
            TileKey::Name(name) => Some(name),
        }
    }

    pub fn is_solid<'a>(&'a self, tile: impl Into<TileKey<'a>>) -> bool {
        self.resolve(tile.into())
            .map(|name| self.solid.contains(name))
            .unwrap_or(false)
    }

    pub fn is_land<'a>(&'a self, tile: impl Into<TileKey<'a>>) -> bool {
        self.resolve(tile.into())
            .map(|name| self.land.contains(name))
            .unwrap_or(false)
    }

    pub fn is_bright<'a>(&'a self, tile: impl Into<TileKey<'a>>) -> bool {
        self.resolve(tile.into())
            .map(|name| self.bright.contains(name))
            .unwrap_or(false)
    }

    pub fn is_in_category<'a>(
        &'a self,
        tile: impl Into<TileKey<'a>>,
        category: &Identifier,
    ) -> bool {
        self.categories_of(tile)
            .map(|categories| categories.contains(category))
            .unwrap_or(false)
    }

    /// Categories a tile belongs to
    pub fn categories_of<'a>(
        &'a self,
        tile: impl Into<TileKey<'a>>,
    ) -> Option<&'a BTreeSet<Identifier>> {
        let name = self.resolve(tile.into())?;
        self.tile_categories.get(name)
    }

    /// Tiles belonging to a category
    pub fn tiles_in_category(&self, category: &Identifier) -> Option<&BTreeSet<Identifier>> {
        self.categories.get(category)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &Identifier> {
        self.categories.keys()
    }

    pub fn autotile_set(&self, set: &Identifier) -> Option<&Arc<AutotileSet>> {
        self.autotile_sets.get(set)
    }

    /// The autotile set a tile is a member of
    pub fn autotile_set_of<'a>(
        &'a self,
        tile: impl Into<TileKey<'a>>,
    ) -> Option<&'a Arc<AutotileSet>> {
        let name = self.resolve(tile.into())?;
        self.tile_autotiles.get(name)
    }

    pub fn autotile_sets(&self) -> impl Iterator<Item = &Arc<AutotileSet>> {
        self.autotile_sets.values()
    }

    /// Marching data for a blend-aware tile; `None` for ordinary tiles
    pub fn marchable_info(&self, name: &Identifier) -> Option<&MarchableInfo> {
        self.marchable.get(name).map(Arc::as_ref)
    }

    /// Marching data by ID, memoized per cell on first lookup
    pub fn marchable_info_for_id(&self, id: TileId) -> Option<&MarchableInfo> {
        let slot = self.marchable_cache.get(id as usize)?;
        slot.get_or_init(|| {
            self.name_of(id)
                .and_then(|name| self.marchable.get(name))
                .cloned()
        })
        .as_deref()
    }

    /// Upper cell linked to a tall tile's lower cell
    pub fn upper_of(&self, id: TileId) -> Option<TileId> {
        self.uppers.get(&id).copied()
    }

    pub fn uppers(&self) -> impl Iterator<Item = (TileId, TileId)> + '_ {
        self.uppers.iter().map(|(&lower, &upper)| (lower, upper))
    }

    /// Item dropped by a tile, if any
    pub fn stack_item_of<'a>(&'a self, tile: impl Into<TileKey<'a>>) -> Option<&'a Identifier> {
        let name = self.resolve(tile.into())?;
        self.stack_items.get(name)
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Serializable snapshot of every lookup table
    pub fn tables(&self) -> TilesetTables {
        let sorted = |set: &HashSet<Identifier>| set.iter().cloned().collect::<BTreeSet<_>>();

        TilesetTables {
            name: self.name.clone(),
            hash: self.hash.to_hex(),
            dimension: self.atlas.dimension(),
            columns: self.atlas.columns(),
            tile_count: self.tile_count(),
            ids: self
                .ids
                .iter()
                .map(|(name, &id)| (name.clone(), id))
                .collect(),
            solid: sorted(&self.solid),
            land: sorted(&self.land),
            bright: sorted(&self.bright),
            categories: self.categories.clone(),
            autotiles: self
                .autotile_sets
                .iter()
                .map(|(id, set)| {
                    (
                        id.clone(),
                        AutotileTable {
                            members: set.members.clone(),
                            omni: set.omni,
                        },
                    )
                })
                .collect(),
            marchable: self
                .marchable
                .iter()
                .map(|(name, info)| {
                    (
                        name.clone(),
                        MarchableTable {
                            autotile: info.autotile_set.identifier.clone(),
                            corner: info.corner,
                            tall: info.tall,
                            eight_way: info.eight_way,
                        },
                    )
                })
                .collect(),
            uppers: self.uppers.clone(),
            stack_items: self
                .stack_items
                .iter()
                .map(|(tile, item)| (tile.clone(), item.clone()))
                .collect(),
        }
    }
}

/// Persistable form of a tileset's lookup tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetTables {
    pub name: Identifier,
    pub hash: String,
    pub dimension: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub ids: BTreeMap<Identifier, TileId>,
    pub solid: BTreeSet<Identifier>,
    pub land: BTreeSet<Identifier>,
    pub bright: BTreeSet<Identifier>,
    pub categories: BTreeMap<Identifier, BTreeSet<Identifier>>,
    pub autotiles: BTreeMap<Identifier, AutotileTable>,
    pub marchable: BTreeMap<Identifier, MarchableTable>,
    pub uppers: BTreeMap<TileId, TileId>,
    pub stack_items: BTreeMap<Identifier, Identifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutotileTable {
    pub members: BTreeSet<Identifier>,
    pub omni: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarchableTable {
    pub autotile: Identifier,
    pub corner: TileId,
    pub tall: bool,
    pub eight_way: bool,
}
