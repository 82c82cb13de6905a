//! Assembles an immutable `Tileset` from tile records and decoded images

use crate::hash::ContentHasher;
use crate::BuildError;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tilestitch_atlas::{PackItem, PackRequest, SourceImage, StrategyKind};
use tilestitch_autotile::AutotileCatalog;
use tilestitch_core::{
    ConfigError, ContentHash, Identifier, MemberSpec, ShapeClass, TileRecord, Tileset,
    TilesetParts, TilesetRecord, EMPTY_ID,
};

type CategoryTable = BTreeMap<Identifier, BTreeSet<Identifier>>;

/// Collects tiles, then packs and freezes them in one `build` call
#[derive(Debug, Clone)]
pub struct TilesetBuilder {
    record: TilesetRecord,
    tiles: Vec<(TileRecord, SourceImage)>,
    strategy: StrategyKind,
}

/// A tile whose shape has been checked against its image
struct ResolvedTile {
    record: TileRecord,
    shape: ShapeClass,
    image: SourceImage,
}

impl Default for TilesetBuilder {
    fn default() -> Self {
        Self::new(TilesetRecord::default())
    }
}

impl TilesetBuilder {
    pub fn new(record: TilesetRecord) -> Self {
        Self {
            record,
            tiles: Vec::new(),
            strategy: StrategyKind::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_tile(mut self, record: TileRecord, image: SourceImage) -> Self {
        self.add_tile(record, image);
        self
    }

    /// Queue a tile; duplicates are reported by `build`
    pub fn add_tile(&mut self, record: TileRecord, image: SourceImage) -> &mut Self {
        self.tiles.push((record, image));
        self
    }

    pub fn record(&self) -> &TilesetRecord {
        &self.record
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Pack every tile and freeze the lookup tables
    pub fn build(self) -> Result<Tileset, BuildError> {
        let TilesetBuilder {
            record,
            mut tiles,
            strategy,
        } = self;

        tracing::info!(
            tileset = %record.name,
            tiles = tiles.len(),
            strategy = ?strategy,
            "building tileset"
        );

        tiles.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        if let Some(pair) = tiles.windows(2).find(|pair| pair[0].0.name == pair[1].0.name) {
            return Err(ConfigError::DuplicateTile(pair[0].0.name.clone()).into());
        }

        let hash = hash_inputs(&record, &tiles)?;

        let mut resolved = Vec::with_capacity(tiles.len());
        for (tile, image) in tiles {
            image.validate(&tile.name)?;
            let shape = image.resolve_shape(&tile.name, tile.shape)?;
            resolved.push(ResolvedTile {
                record: tile,
                shape,
                image,
            });
        }

        check_empty_tile(&record, &resolved)?;
        let categories = category_table(&resolved);
        let catalog = build_catalog(&record, &resolved, &categories)?;
        let stack_items = resolve_stack_items(&record, &resolved, &categories)?;

        let flagged = |flag: fn(&TileRecord) -> bool| -> HashSet<Identifier> {
            resolved
                .iter()
                .filter(|tile| flag(&tile.record))
                .map(|tile| tile.record.name.clone())
                .collect()
        };
        let solid = flagged(|r| r.solid);
        let land = flagged(|r| r.land);
        let bright = flagged(|r| r.bright);

        let mut request = PackRequest {
            combos: record.combos.clone(),
            ..Default::default()
        };
        for tile in resolved {
            let item = PackItem::new(tile.record.name, tile.shape, tile.image);
            if item.name == record.empty {
                request.empty = Some(item);
            } else {
                request.items.push(item);
            }
        }

        let packing = strategy.packer().pack(&request)?;
        let frozen = catalog.finish(
            packing
                .placements
                .iter()
                .map(|p| (p.name.clone(), p.shape, p.base)),
        )?;

        let mut ids = HashMap::with_capacity(packing.placements.len() + 1);
        let mut names = vec![None; packing.tile_count as usize];
        ids.insert(record.empty.clone(), EMPTY_ID);
        names[EMPTY_ID as usize] = Some(record.empty.clone());
        for placement in &packing.placements {
            ids.insert(placement.name.clone(), placement.base);
            for id in placement.ids() {
                names[id as usize] = Some(placement.name.clone());
            }
        }

        tracing::info!(
            tileset = %record.name,
            tiles = ids.len(),
            cells = packing.tile_count,
            dimension = packing.atlas.dimension(),
            autotile_sets = frozen.sets.len(),
            hash = %hash,
            "built tileset"
        );

        Ok(Tileset::from_parts(TilesetParts {
            name: record.name,
            empty: record.empty,
            ids,
            names,
            solid,
            land,
            bright,
            categories,
            autotile_sets: frozen.sets,
            marchable: frozen.marchable,
            uppers: packing.uppers,
            stack_items,
            hash,
            atlas: packing.atlas,
        }))
    }
}

/// Tileset record first, then every tile in name order
fn hash_inputs(
    record: &TilesetRecord,
    tiles: &[(TileRecord, SourceImage)],
) -> Result<ContentHash, serde_json::Error> {
    let mut hasher = ContentHasher::new();
    hasher.record(record)?;
    for (tile, image) in tiles {
        hasher.record(tile)?;
        hasher.image(image);
    }
    Ok(hasher.finish())
}

fn check_empty_tile(record: &TilesetRecord, tiles: &[ResolvedTile]) -> Result<(), ConfigError> {
    let Some(empty) = tiles.iter().find(|tile| tile.record.name == record.empty) else {
        return Ok(());
    };
    if empty.shape != ShapeClass::Single {
        return Err(ConfigError::EmptyTileShape {
            tile: record.empty.clone(),
            shape: empty.shape,
        });
    }
    if !empty.record.categories.is_empty() || empty.record.autotile.is_some() {
        return Err(ConfigError::EmptyTileMembership(record.empty.clone()));
    }
    Ok(())
}

fn category_table(tiles: &[ResolvedTile]) -> CategoryTable {
    let mut categories = CategoryTable::new();
    for tile in tiles {
        for category in &tile.record.categories {
            categories
                .entry(category.clone())
                .or_default()
                .insert(tile.record.name.clone());
        }
    }
    categories
}

/// Per-tile `autotile` fields first, then tileset rules in file order
///
/// Only sets named by a tileset rule exist; a tile field cannot create one.
fn build_catalog(
    record: &TilesetRecord,
    tiles: &[ResolvedTile],
    categories: &CategoryTable,
) -> Result<AutotileCatalog, ConfigError> {
    let known: HashSet<&Identifier> = tiles.iter().map(|tile| &tile.record.name).collect();
    let declared: HashSet<&Identifier> = record.autotiles.iter().map(|(set, _)| set).collect();
    let mut catalog = AutotileCatalog::new();

    for tile in tiles {
        if let Some(set) = &tile.record.autotile {
            if !declared.contains(set) {
                return Err(ConfigError::UnknownAutotileSet {
                    set: set.clone(),
                    referenced_by: format!("tile '{}'", tile.record.name),
                });
            }
            catalog.assign(tile.record.name.clone(), set.clone());
        }
    }

    for (set, spec) in &record.autotiles {
        if let MemberSpec::Tile(tile) = spec {
            if tile == &record.empty {
                return Err(ConfigError::EmptyTileMembership(tile.clone()));
            }
            if !known.contains(tile) {
                return Err(ConfigError::UnknownTile {
                    tile: tile.clone(),
                    referenced_by: format!("autotile set '{set}'"),
                });
            }
        }
        catalog.apply_rule(set, spec, categories)?;
    }

    for set in &record.omnitiles {
        catalog.mark_omni(set)?;
    }

    if catalog.set_of(&record.empty).is_some() {
        return Err(ConfigError::EmptyTileMembership(record.empty.clone()));
    }

    Ok(catalog)
}

/// A tile's own item wins over the first matching `stacks` category
fn resolve_stack_items(
    record: &TilesetRecord,
    tiles: &[ResolvedTile],
    categories: &CategoryTable,
) -> Result<HashMap<Identifier, Identifier>, ConfigError> {
    for (category, _) in &record.stacks {
        if !categories.contains_key(category) {
            return Err(ConfigError::UnknownCategory {
                category: category.clone(),
                referenced_by: "stacks".to_string(),
            });
        }
    }

    let mut stack_items = HashMap::new();
    for tile in tiles {
        let name = &tile.record.name;
        let item = tile.record.stack_item.as_ref().or_else(|| {
            record
                .stacks
                .iter()
                .find(|(category, _)| {
                    categories
                        .get(category)
                        .is_some_and(|members| members.contains(name))
                })
                .map(|(_, item)| item)
        });
        if let Some(item) = item {
            stack_items.insert(name.clone(), item.clone());
        }
    }
    Ok(stack_items)
}
