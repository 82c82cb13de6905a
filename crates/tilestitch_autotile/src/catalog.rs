//! Autotile membership catalog
//!
//! Resolves declarative membership rules into concrete sets, then freezes
//! them against the packer's ID assignment to produce per-tile marching data.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tilestitch_core::{
    AutotileSet, ConfigError, Identifier, MarchableInfo, MemberSpec, ShapeClass, TileId,
};

#[derive(Debug, Clone, Default)]
struct CatalogSet {
    members: BTreeSet<Identifier>,
    omni: bool,
}

/// Mutable registry of autotile sets used while building a tileset
#[derive(Debug, Clone, Default)]
pub struct AutotileCatalog {
    sets: BTreeMap<Identifier, CatalogSet>,
    /// Tile name -> the one set it belongs to
    assignments: HashMap<Identifier, Identifier>,
}

/// Catalog output once every member tile has an ID
#[derive(Debug, Clone, Default)]
pub struct FrozenCatalog {
    pub sets: BTreeMap<Identifier, Arc<AutotileSet>>,
    pub marchable: HashMap<Identifier, MarchableInfo>,
}

impl AutotileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a tile into a set, moving it out of any other set
    ///
    /// Returns `false` when the tile was already in `set`.
    pub fn assign(&mut self, tile: Identifier, set: Identifier) -> bool {
        if let Some(previous) = self.assignments.get(&tile) {
            if previous == &set {
                return false;
            }
            if let Some(old) = self.sets.get_mut(previous) {
                old.members.remove(&tile);
            }
        }

        self.sets
            .entry(set.clone())
            .or_default()
            .members
            .insert(tile.clone());
        self.assignments.insert(tile, set);
        true
    }

    /// Expand a category to its current members
    pub fn resolve_category_members<'a>(
        &self,
        categories: &'a BTreeMap<Identifier, BTreeSet<Identifier>>,
        category: &Identifier,
        referenced_by: &Identifier,
    ) -> Result<&'a BTreeSet<Identifier>, ConfigError> {
        categories
            .get(category)
            .ok_or_else(|| ConfigError::UnknownCategory {
                category: category.clone(),
                referenced_by: format!("autotile set '{referenced_by}'"),
            })
    }

    /// Apply one `(set, member spec)` rule; categories are expanded now, not lazily
    pub fn apply_rule(
        &mut self,
        set: &Identifier,
        spec: &MemberSpec,
        categories: &BTreeMap<Identifier, BTreeSet<Identifier>>,
    ) -> Result<(), ConfigError> {
        match spec {
            MemberSpec::Tile(tile) => {
                self.assign(tile.clone(), set.clone());
            }
            MemberSpec::Category(category) => {
                let members: Vec<Identifier> = self
                    .resolve_category_members(categories, category, set)?
                    .iter()
                    .cloned()
                    .collect();
                for tile in members {
                    self.assign(tile, set.clone());
                }
            }
        }
        Ok(())
    }

    /// Flag a set as blending against any solid tile
    ///
    /// A set nobody was assigned to (or that every member moved out of) is
    /// treated as undeclared.
    pub fn mark_omni(&mut self, set: &Identifier) -> Result<(), ConfigError> {
        match self.sets.get_mut(set) {
            Some(entry) if !entry.members.is_empty() => {
                entry.omni = true;
                Ok(())
            }
            _ => Err(ConfigError::UnknownAutotileSet {
                set: set.clone(),
                referenced_by: "omnitiles".to_string(),
            }),
        }
    }

    /// Set a tile currently belongs to
    pub fn set_of(&self, tile: &Identifier) -> Option<&Identifier> {
        self.assignments.get(tile)
    }

    pub fn members(&self, set: &Identifier) -> Option<&BTreeSet<Identifier>> {
        self.sets.get(set).map(|s| &s.members)
    }

    pub fn is_omni(&self, set: &Identifier) -> bool {
        self.sets.get(set).map(|s| s.omni).unwrap_or(false)
    }

    /// Every assigned tile, in name order
    pub fn assigned_tiles(&self) -> impl Iterator<Item = (&Identifier, &Identifier)> {
        let mut pairs: Vec<_> = self.assignments.iter().collect();
        pairs.sort();
        pairs.into_iter()
    }

    /// Freeze the sets and build marching data for every autotile block
    ///
    /// `blocks` yields `(tile, shape, base id)` for every placed tile; only
    /// autotile-shaped tiles receive `MarchableInfo`, and each of them must
    /// belong to a set.
    pub fn finish<I>(self, blocks: I) -> Result<FrozenCatalog, ConfigError>
    where
        I: IntoIterator<Item = (Identifier, ShapeClass, TileId)>,
    {
        let sets: BTreeMap<Identifier, Arc<AutotileSet>> = self
            .sets
            .into_iter()
            .map(|(identifier, set)| {
                let frozen = AutotileSet {
                    identifier: identifier.clone(),
                    members: set.members,
                    omni: set.omni,
                };
                (identifier, Arc::new(frozen))
            })
            .collect();

        let mut marchable = HashMap::new();
        for (tile, shape, base) in blocks {
            if !shape.is_autotile() {
                continue;
            }
            let set = self
                .assignments
                .get(&tile)
                .and_then(|set| sets.get(set))
                .ok_or_else(|| ConfigError::MissingAutotileSet {
                    tile: tile.clone(),
                    shape,
                })?;
            marchable.insert(
                tile,
                MarchableInfo {
                    autotile_set: Arc::clone(set),
                    corner: base,
                    tall: shape == ShapeClass::TallAutotile,
                    eight_way: shape.is_eight_way(),
                },
            );
        }

        Ok(FrozenCatalog { sets, marchable })
    }
}
