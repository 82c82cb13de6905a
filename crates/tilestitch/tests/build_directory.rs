//! End-to-end builds of tile directories written to a temp dir

use std::path::Path;
use tilestitch::prelude::*;
use tilestitch::tilestitch_autotile::march::{neighbors, variant8};
use tilestitch::ConfigError;

fn id(s: &str) -> Identifier {
    s.parse().unwrap()
}

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    image::RgbaImage::from_pixel(width, height, image::Rgba(color))
        .save(path)
        .unwrap();
}

fn write_tileset(root: &Path, json: &str) {
    std::fs::write(root.join("tileset.json"), json).unwrap();
}

fn write_tile(root: &Path, dir: &str, json: &str, size: (u32, u32), color: [u8; 4]) {
    let dir = root.join(dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tile.json"), json).unwrap();
    write_png(&dir.join("tile.png"), size.0, size.1, color);
}

/// grass (16x16) plus a 64x64 water block in set `water`
fn grass_and_water(root: &Path) {
    std::fs::write(
        root.join("tileset.json"),
        r#"{
            "name": "base:tileset/test",
            "autotiles": [["base:autotile/water", "base:tile/water"]]
        }"#,
    )
    .unwrap();
    write_tile(
        root,
        "grass",
        r#"{ "name": "base:tile/grass", "land": true, "categories": ["base:category/plants"] }"#,
        (16, 16),
        [40, 160, 40, 255],
    );
    write_tile(
        root,
        "water",
        r#"{ "name": "base:tile/water" }"#,
        (64, 64),
        [20, 60, 200, 255],
    );
}

#[test]
fn grass_and_water_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());

    let tileset = build_directory(tmp.path()).unwrap();
    assert_eq!(tileset.name(), &id("base:tileset/test"));
    assert!(tileset.atlas().dimension() >= 64);
    assert_eq!(tileset.atlas().dimension() % 16, 0);
    assert!((tileset.atlas().dimension() / 16).is_power_of_two());

    let grass = tileset.id_of(&id("base:tile/grass")).unwrap();
    let water = tileset.id_of(&id("base:tile/water")).unwrap();
    assert_ne!(grass, water);
    assert_ne!(grass, EMPTY_ID);
    assert_ne!(water, EMPTY_ID);
    assert!(tileset.is_land(grass));

    let info = tileset.marchable_info(&id("base:tile/water")).unwrap();
    assert_eq!(info.set_identifier(), &id("base:autotile/water"));
    assert_eq!(info.corner, water);

    // N and W present, no diagonal
    let nw = march8(|dx, dy| matches!((dx, dy), (0, -1) | (-1, 0)));
    assert_eq!(Some(nw), variant8(neighbors::N | neighbors::W));
    // A lone NW diagonal only counts when N and W are both present
    let diagonal_only = march8(|dx, dy| (dx, dy) == (-1, -1));
    assert_eq!(diagonal_only, march8(|_, _| false));
    let filled = march8(|dx, dy| matches!((dx, dy), (0, -1) | (-1, 0) | (-1, -1)));
    assert_ne!(filled, nw);

    // Pixels made it into the atlas
    let cell = tileset.atlas().cell_pixels(water + 5).unwrap();
    assert_eq!(&cell[..4], &[20, 60, 200, 255]);
    let cell = tileset.atlas().cell_pixels(grass).unwrap();
    assert_eq!(&cell[..4], &[40, 160, 40, 255]);
}

#[test]
fn empty_tile_is_zero_and_unclassified() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());

    let tileset = build_directory(tmp.path()).unwrap();
    assert_eq!(tileset.id_of(&id("base:tile/empty")), Some(EMPTY_ID));
    assert_eq!(tileset.categories_of(EMPTY_ID), None);
    assert!(tileset.autotile_set_of(EMPTY_ID).is_none());
    assert!(tileset.marchable_info_for_id(EMPTY_ID).is_none());
}

#[test]
fn every_base_id_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());
    write_tile(
        tmp.path(),
        "tree",
        r#"{ "name": "base:tile/tree", "solid": true, "categories": ["base:category/plants"] }"#,
        (16, 32),
        [90, 60, 30, 255],
    );

    let tileset = build_directory(tmp.path()).unwrap();
    for (name, base) in tileset.tiles() {
        assert_eq!(tileset.name_of(base), Some(name));
        assert_eq!(tileset.id_of(name), Some(base));
    }

    let plants = id("base:category/plants");
    for tile in tileset.tiles_in_category(&plants).unwrap() {
        assert!(tileset.categories_of(tile).unwrap().contains(&plants));
    }
    for category in tileset.category_names() {
        for tile in tileset.tiles_in_category(category).unwrap() {
            assert!(tileset.is_in_category(tile, category));
        }
    }

    let tree = tileset.id_of(&id("base:tile/tree")).unwrap();
    let upper = tileset.upper_of(tree).unwrap();
    assert_ne!(upper, tree);
    assert_eq!(tileset.name_of(upper), Some(&id("base:tile/tree")));
}

#[test]
fn hash_is_stable_and_sensitive() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());

    let first = build_directory(tmp.path()).unwrap();
    let second = build_directory(tmp.path()).unwrap();
    assert_eq!(first.content_hash(), second.content_hash());

    // Change a single pixel of the grass image
    let path = tmp.path().join("grass/tile.png");
    let mut grass = image::open(&path).unwrap().to_rgba8();
    grass.put_pixel(7, 7, image::Rgba([41, 160, 40, 255]));
    grass.save(&path).unwrap();

    let third = build_directory(tmp.path()).unwrap();
    assert_ne!(first.content_hash(), third.content_hash());
}

#[test]
fn tall_autotile_links_every_variant() {
    let tmp = tempfile::tempdir().unwrap();
    write_tileset(
        tmp.path(),
        r#"{ "autotiles": [["base:autotile/cliff", "base:tile/cliff"]] }"#,
    );
    write_tile(
        tmp.path(),
        "cliff",
        r#"{ "name": "base:tile/cliff", "autotile": "base:autotile/cliff" }"#,
        (64, 128),
        [120, 120, 120, 255],
    );

    let tileset = build_directory(tmp.path()).unwrap();
    let info = tileset.marchable_info(&id("base:tile/cliff")).unwrap();
    assert!(info.tall);
    for variant in 0..16 {
        let lower = info.corner + variant;
        assert_eq!(tileset.upper_of(lower), Some(lower + 16));
    }
}

#[test]
fn wide_block_marches_eight_ways() {
    let tmp = tempfile::tempdir().unwrap();
    write_tileset(
        tmp.path(),
        r#"{ "autotiles": [["base:autotile/ledge", "base:tile/ledge"]] }"#,
    );
    write_tile(
        tmp.path(),
        "ledge",
        r#"{ "name": "base:tile/ledge", "autotile": "base:autotile/ledge", "shape": "wide_autotile48" }"#,
        (128, 96),
        [200, 200, 0, 255],
    );

    let tileset = build_directory(tmp.path()).unwrap();
    let ledge = tileset.id_of(&id("base:tile/ledge")).unwrap();
    assert!(tileset.marchable_info_for_id(ledge).unwrap().eight_way);
    assert_eq!(tileset.march_tile(ledge, |_, _| ledge), ledge + 46);
    assert_eq!(tileset.march_tile(ledge, |_, _| EMPTY_ID), ledge);
}

#[test]
fn rgb_images_are_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("sand");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tile.json"), r#"{ "name": "base:tile/sand" }"#).unwrap();
    image::RgbImage::from_pixel(16, 16, image::Rgb([230, 210, 150]))
        .save(dir.join("tile.png"))
        .unwrap();

    let tileset = build_directory(tmp.path()).unwrap();
    let sand = tileset.id_of(&id("base:tile/sand")).unwrap();
    let cell = tileset.atlas().cell_pixels(sand).unwrap();
    assert_eq!(&cell[..4], &[230, 210, 150, 255]);
}

#[test]
fn declared_shape_must_match_image() {
    let tmp = tempfile::tempdir().unwrap();
    write_tile(
        tmp.path(),
        "water",
        r#"{ "name": "base:tile/water", "shape": "single" }"#,
        (64, 64),
        [0, 0, 255, 255],
    );

    let err = build_directory(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::DimensionMismatch {
            expected_width: 16,
            width: 64,
            ..
        })
    ));
}

#[test]
fn duplicate_names_across_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let json = r#"{ "name": "base:tile/grass" }"#;
    write_tile(tmp.path(), "a/grass", json, (16, 16), [0, 255, 0, 255]);
    write_tile(tmp.path(), "b/grass", json, (16, 16), [0, 250, 0, 255]);

    let err = build_directory(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::DuplicateTile(name)) if name == id("base:tile/grass")
    ));
}

#[test]
fn undeclared_category_in_rules() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());
    std::fs::write(
        tmp.path().join("tileset.json"),
        r#"{ "autotiles": [["base:autotile/fence", "category:base:category/fences"]] }"#,
    )
    .unwrap();

    let err = build_directory(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::UnknownCategory { .. })
    ));
}

#[test]
fn tile_naming_an_undeclared_set() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());
    write_tile(
        tmp.path(),
        "lake",
        r#"{ "name": "base:tile/lake", "autotile": "base:autotile/watr" }"#,
        (64, 64),
        [20, 60, 200, 255],
    );

    let err = build_directory(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::UnknownAutotileSet { set, .. }) if set == id("base:autotile/watr")
    ));
}

#[test]
fn combos_share_a_slab() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("tileset.json"),
        r#"{
            "autotiles": [["base:autotile/cliff", "base:tile/cliff"],
                          ["base:autotile/cliff", "base:tile/cliff_cap"]],
            "combos": [["base:tile/cliff", "base:tile/cliff_cap"]]
        }"#,
    )
    .unwrap();
    write_tile(
        tmp.path(),
        "cliff",
        r#"{ "name": "base:tile/cliff" }"#,
        (128, 96),
        [100, 100, 100, 255],
    );
    write_tile(
        tmp.path(),
        "cliff_cap",
        r#"{ "name": "base:tile/cliff_cap" }"#,
        (64, 64),
        [150, 150, 150, 255],
    );

    let tileset = build_directory(tmp.path()).unwrap();
    let cliff = tileset.id_of(&id("base:tile/cliff")).unwrap();
    let cap = tileset.id_of(&id("base:tile/cliff_cap")).unwrap();
    assert_eq!(cliff % 64, 0);
    assert_eq!(cap, cliff + 48);

    let set = tileset.autotile_set(&id("base:autotile/cliff")).unwrap();
    assert_eq!(set.members.len(), 2);
}

#[test]
fn legacy_strategy_rejects_wide_blocks() {
    let tmp = tempfile::tempdir().unwrap();
    write_tileset(
        tmp.path(),
        r#"{ "autotiles": [["base:autotile/ledge", "base:tile/ledge"]] }"#,
    );
    write_tile(
        tmp.path(),
        "ledge",
        r#"{ "name": "base:tile/ledge", "autotile": "base:autotile/ledge" }"#,
        (128, 96),
        [200, 200, 0, 255],
    );

    let err = TilesetBuilder::from_directory(tmp.path())
        .unwrap()
        .with_strategy(StrategyKind::Legacy)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::UnsupportedShape { .. })
    ));
}

#[test]
fn tables_round_trip_through_json() {
    let tmp = tempfile::tempdir().unwrap();
    grass_and_water(tmp.path());

    let tileset = build_directory(tmp.path()).unwrap();
    let tables = tileset.tables();
    let json = serde_json::to_string_pretty(&tables).unwrap();
    let back: tilestitch::TilesetTables = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tables);
    assert_eq!(back.hash, tileset.content_hash().to_hex());
    assert_eq!(back.marchable[&id("base:tile/water")].autotile, id("base:autotile/water"));
}
