//! Already-parsed tile and tileset metadata

use crate::{ConfigError, Identifier, ShapeClass};
use serde::{Deserialize, Serialize};
use std::fmt;

const CATEGORY_PREFIX: &str = "category:";

/// Per-tile metadata, one per source image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub name: Identifier,
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub land: bool,
    #[serde(default)]
    pub bright: bool,
    #[serde(default)]
    pub categories: Vec<Identifier>,
    /// Autotile set this tile belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autotile: Option<Identifier>,
    /// Item dropped when the tile is broken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_item: Option<Identifier>,
    /// Declared shape; inferred from the image size when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeClass>,
}

impl TileRecord {
    pub fn new(name: Identifier) -> Self {
        Self {
            name,
            solid: false,
            land: false,
            bright: false,
            categories: Vec::new(),
            autotile: None,
            stack_item: None,
            shape: None,
        }
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn with_land(mut self, land: bool) -> Self {
        self.land = land;
        self
    }

    pub fn with_bright(mut self, bright: bool) -> Self {
        self.bright = bright;
        self
    }

    pub fn with_category(mut self, category: Identifier) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_autotile(mut self, autotile: Identifier) -> Self {
        self.autotile = Some(autotile);
        self
    }

    pub fn with_stack_item(mut self, item: Identifier) -> Self {
        self.stack_item = Some(item);
        self
    }

    pub fn with_shape(mut self, shape: ShapeClass) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Which tiles an autotile rule adds to a set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MemberSpec {
    /// A single tile by name
    Tile(Identifier),
    /// Every tile in the category at catalog-build time (`category:<name>`)
    Category(Identifier),
}

impl std::str::FromStr for MemberSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(CATEGORY_PREFIX) {
            Some(category) => category
                .parse()
                .map(MemberSpec::Category)
                .map_err(|_| ConfigError::InvalidMemberSpec(s.to_string())),
            None => s
                .parse()
                .map(MemberSpec::Tile)
                .map_err(|_| ConfigError::InvalidMemberSpec(s.to_string())),
        }
    }
}

impl TryFrom<String> for MemberSpec {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberSpec> for String {
    fn from(spec: MemberSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for MemberSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSpec::Tile(tile) => write!(f, "{tile}"),
            MemberSpec::Category(category) => write!(f, "{CATEGORY_PREFIX}{category}"),
        }
    }
}

/// Tileset-wide configuration (`tileset.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetRecord {
    #[serde(default = "Identifier::default_tileset")]
    pub name: Identifier,
    /// Tile that always receives ID 0
    #[serde(default = "Identifier::empty_tile")]
    pub empty: Identifier,
    /// Autotile membership rules, applied in order
    #[serde(default)]
    pub autotiles: Vec<(Identifier, MemberSpec)>,
    /// Autotile sets that blend against any solid tile
    #[serde(default)]
    pub omnitiles: Vec<Identifier>,
    /// (category, item) pairs giving the stack item of every tile in a category
    #[serde(default)]
    pub stacks: Vec<(Identifier, Identifier)>,
    /// (48-cell tile, 16-cell tile) pairs packed into one slab
    #[serde(default)]
    pub combos: Vec<(Identifier, Identifier)>,
}

impl Default for TilesetRecord {
    fn default() -> Self {
        Self {
            name: Identifier::default_tileset(),
            empty: Identifier::empty_tile(),
            autotiles: Vec::new(),
            omnitiles: Vec::new(),
            stacks: Vec::new(),
            combos: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    #[test]
    fn test_member_spec_parsing() {
        assert_eq!(
            "base:tile/water".parse::<MemberSpec>().unwrap(),
            MemberSpec::Tile(id("base:tile/water"))
        );
        assert_eq!(
            "category:base:category/fences".parse::<MemberSpec>().unwrap(),
            MemberSpec::Category(id("base:category/fences"))
        );
        assert!("category:fences".parse::<MemberSpec>().is_err());
        assert!("water".parse::<MemberSpec>().is_err());
    }

    #[test]
    fn test_member_spec_display_round_trip() {
        let spec = MemberSpec::Category(id("base:category/fences"));
        assert_eq!(spec.to_string().parse::<MemberSpec>().unwrap(), spec);
    }

    #[test]
    fn test_parse_minimal_tile_record() {
        let record: TileRecord = serde_json::from_str(r#"{ "name": "base:tile/grass" }"#).unwrap();
        assert_eq!(record, TileRecord::new(id("base:tile/grass")));
    }

    #[test]
    fn test_parse_full_tile_record() {
        let json = r#"{
            "name": "base:tile/tree",
            "solid": true,
            "land": false,
            "bright": true,
            "categories": ["base:category/plants"],
            "stack_item": "base:item/wood",
            "shape": "tall_single"
        }"#;
        let record: TileRecord = serde_json::from_str(json).unwrap();
        assert!(record.solid);
        assert!(record.bright);
        assert_eq!(record.categories, vec![id("base:category/plants")]);
        assert_eq!(record.stack_item, Some(id("base:item/wood")));
        assert_eq!(record.shape, Some(ShapeClass::TallSingle));
        assert_eq!(record.autotile, None);
    }

    #[test]
    fn test_parse_tileset_record_defaults() {
        let record: TilesetRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, TilesetRecord::default());
        assert_eq!(record.empty.as_str(), crate::EMPTY_TILE);
    }

    #[test]
    fn test_parse_tileset_record() {
        let json = r#"{
            "name": "base:tileset/monomap",
            "autotiles": [
                ["base:autotile/water", "base:tile/water"],
                ["base:autotile/fence", "category:base:category/fences"]
            ],
            "omnitiles": ["base:autotile/fence"],
            "stacks": [["base:category/plants", "base:item/plant_fibre"]],
            "combos": [["base:tile/cliff", "base:tile/cliff_cap"]]
        }"#;
        let record: TilesetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.autotiles.len(), 2);
        assert_eq!(
            record.autotiles[1].1,
            MemberSpec::Category(id("base:category/fences"))
        );
        assert_eq!(record.omnitiles, vec![id("base:autotile/fence")]);
        assert_eq!(record.combos[0].1, id("base:tile/cliff_cap"));
    }

    #[test]
    fn test_bad_identifier_in_record_is_rejected() {
        let result = serde_json::from_str::<TileRecord>(r#"{ "name": "grass" }"#);
        assert!(result.is_err());
    }
}
