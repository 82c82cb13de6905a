//! Packer inputs and outputs, plus the pixel copy shared by every strategy

use crate::SourceImage;
use std::collections::{BTreeMap, HashSet};
use tilestitch_core::{Atlas, ConfigError, Identifier, ShapeClass, TileId, EMPTY_ID, TILE_SIZE};

/// Consecutive cells forming one packing unit
pub const SLAB_CELLS: u32 = 64;

/// Smallest atlas side length (in cells) is one slab wide
pub const MIN_COLUMNS: u32 = SLAB_CELLS;

/// One tile image to place
#[derive(Debug, Clone)]
pub struct PackItem {
    pub name: Identifier,
    pub shape: ShapeClass,
    pub image: SourceImage,
}

impl PackItem {
    pub fn new(name: Identifier, shape: ShapeClass, image: SourceImage) -> Self {
        Self { name, shape, image }
    }
}

/// Everything a packer needs
#[derive(Debug, Clone, Default)]
pub struct PackRequest {
    /// Placed in this order within each shape class
    pub items: Vec<PackItem>,
    /// (48-cell tile, 16-cell tile) pairs sharing one slab
    pub combos: Vec<(Identifier, Identifier)>,
    /// Image for the reserved cell 0; left transparent when absent
    pub empty: Option<PackItem>,
}

impl PackRequest {
    pub fn new(items: Vec<PackItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_combo(mut self, wide: Identifier, short: Identifier) -> Self {
        self.combos.push((wide, short));
        self
    }

    pub fn with_empty(mut self, empty: PackItem) -> Self {
        self.empty = Some(empty);
        self
    }

    /// Check every image against its shape and reject duplicate names
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(&item.name) {
                return Err(ConfigError::DuplicateTile(item.name.clone()));
            }
            item.image.validate(&item.name)?;
            item.image.check_shape(&item.name, item.shape)?;
        }

        if let Some(empty) = &self.empty {
            if empty.shape != ShapeClass::Single {
                return Err(ConfigError::EmptyTileShape {
                    tile: empty.name.clone(),
                    shape: empty.shape,
                });
            }
            if seen.contains(&empty.name) {
                return Err(ConfigError::DuplicateTile(empty.name.clone()));
            }
            empty.image.validate(&empty.name)?;
            empty.image.check_shape(&empty.name, ShapeClass::Single)?;
        }
        Ok(())
    }
}

/// Where one tile landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: Identifier,
    pub shape: ShapeClass,
    /// First ID of the block
    pub base: TileId,
    /// The block occupies `base..base + cells`
    pub cells: u32,
}

impl Placement {
    pub fn ids(&self) -> std::ops::Range<TileId> {
        self.base..self.base + self.cells
    }
}

/// Result of a packing run
#[derive(Debug, Clone)]
pub struct Packing {
    pub atlas: Atlas,
    /// Highest used ID + 1
    pub tile_count: u32,
    /// One entry per requested item, in request order
    pub placements: Vec<Placement>,
    /// Lower ID -> upper ID for tall shapes
    pub uppers: BTreeMap<TileId, TileId>,
}

impl Packing {
    pub fn placement(&self, name: &Identifier) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.name == name)
    }
}

/// Smallest power-of-two side (in cells, at least one slab) holding `cells`
pub fn columns_for_cells(cells: u64) -> u32 {
    let mut columns = MIN_COLUMNS;
    while u64::from(columns) * u64::from(columns) < cells {
        columns *= 2;
    }
    columns
}

/// Allocate the atlas once and copy every block into it
///
/// `bases[i]` is the first ID of `request.items[i]`.
pub(crate) fn render(request: &PackRequest, bases: &[TileId], columns: u32) -> Packing {
    debug_assert_eq!(bases.len(), request.items.len());

    let mut atlas = Atlas::new(columns * TILE_SIZE);
    let mut uppers = BTreeMap::new();
    let mut placements = Vec::with_capacity(request.items.len());
    let mut tile_count = EMPTY_ID + 1;

    if let Some(empty) = &request.empty {
        copy_cell(&mut atlas, EMPTY_ID, &empty.image.to_rgba(), TILE_SIZE, 0, 0);
    }

    for (item, &base) in request.items.iter().zip(bases) {
        blit_block(&mut atlas, &mut uppers, item, base);
        let placement = Placement {
            name: item.name.clone(),
            shape: item.shape,
            base,
            cells: item.shape.cell_count(),
        };
        tracing::debug!(
            tile = %placement.name,
            shape = %placement.shape,
            base = placement.base,
            "placed tile"
        );
        tile_count = tile_count.max(placement.ids().end);
        placements.push(placement);
    }

    Packing {
        atlas,
        tile_count,
        placements,
        uppers,
    }
}

/// Shapes and IDs are validated before rendering, so every copy lands
fn copy_cell(atlas: &mut Atlas, id: TileId, rgba: &[u8], width: u32, x: u32, y: u32) {
    let copied = atlas.blit_cell(id, rgba, width, x, y);
    debug_assert!(copied, "cell ({x}, {y}) of a {width}px image does not fit atlas cell {id}");
}

/// Copy one block cell by cell according to its shape's layout
fn blit_block(
    atlas: &mut Atlas,
    uppers: &mut BTreeMap<TileId, TileId>,
    item: &PackItem,
    base: TileId,
) {
    let rgba = item.image.to_rgba();
    let width = item.image.width;

    match item.shape {
        ShapeClass::Single => copy_cell(atlas, base, &rgba, width, 0, 0),
        ShapeClass::TallSingle => {
            copy_cell(atlas, base, &rgba, width, 0, 1);
            copy_cell(atlas, base + 1, &rgba, width, 0, 0);
            uppers.insert(base, base + 1);
        }
        ShapeClass::ShortAutotile => {
            for row in 0..4 {
                for col in 0..4 {
                    copy_cell(atlas, base + row * 4 + col, &rgba, width, col, row);
                }
            }
        }
        ShapeClass::TallAutotile => {
            for row in 0..4 {
                for col in 0..4 {
                    let lower = base + row * 4 + col;
                    let upper = lower + 16;
                    copy_cell(atlas, lower, &rgba, width, col, row * 2 + 1);
                    copy_cell(atlas, upper, &rgba, width, col, row * 2);
                    uppers.insert(lower, upper);
                }
            }
        }
        ShapeClass::WideAutotile48 => {
            for row in 0..6 {
                for col in 0..8 {
                    copy_cell(atlas, base + row * 8 + col, &rgba, width, col, row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    /// Each 16x16 source cell is filled with `[cell_x, cell_y, 0, 255]`
    fn gradient(shape: ShapeClass) -> SourceImage {
        let (width, height) = shape.pixel_size();
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x / 16) as u8, (y / 16) as u8, 0, 255]);
            }
        }
        SourceImage::rgba(width, height, pixels)
    }

    fn cell_color(packing: &Packing, id: TileId) -> [u8; 4] {
        let pixels = packing.atlas.cell_pixels(id).unwrap();
        [pixels[0], pixels[1], pixels[2], pixels[3]]
    }

    #[test]
    fn test_columns_for_cells() {
        assert_eq!(columns_for_cells(0), 64);
        assert_eq!(columns_for_cells(4096), 64);
        assert_eq!(columns_for_cells(4097), 128);
        assert_eq!(columns_for_cells(64 * 65), 128);
        assert_eq!(columns_for_cells(128 * 128 + 1), 256);
    }

    #[test]
    fn test_tall_single_layout() {
        let request = PackRequest::new(vec![PackItem::new(
            id("base:tile/tree"),
            ShapeClass::TallSingle,
            gradient(ShapeClass::TallSingle),
        )]);
        let packing = render(&request, &[5], 64);

        // Lower cell comes from the bottom half
        assert_eq!(cell_color(&packing, 5), [0, 1, 0, 255]);
        assert_eq!(cell_color(&packing, 6), [0, 0, 0, 255]);
        assert_eq!(packing.uppers.get(&5), Some(&6));
        assert_eq!(packing.tile_count, 7);
    }

    #[test]
    fn test_tall_autotile_layout() {
        let request = PackRequest::new(vec![PackItem::new(
            id("base:tile/cliff"),
            ShapeClass::TallAutotile,
            gradient(ShapeClass::TallAutotile),
        )]);
        let packing = render(&request, &[64], 64);

        // Variant 6 is autotile row 1, column 2
        assert_eq!(cell_color(&packing, 64 + 6), [2, 3, 0, 255]);
        assert_eq!(cell_color(&packing, 64 + 16 + 6), [2, 2, 0, 255]);
        assert_eq!(packing.uppers.len(), 16);
        assert_eq!(packing.uppers[&70], 86);
    }

    #[test]
    fn test_wide_and_short_layout() {
        let request = PackRequest::new(vec![
            PackItem::new(
                id("base:tile/cliff"),
                ShapeClass::WideAutotile48,
                gradient(ShapeClass::WideAutotile48),
            ),
            PackItem::new(
                id("base:tile/water"),
                ShapeClass::ShortAutotile,
                gradient(ShapeClass::ShortAutotile),
            ),
        ]);
        let packing = render(&request, &[64, 112], 64);

        assert_eq!(cell_color(&packing, 64 + 13), [5, 1, 0, 255]);
        assert_eq!(cell_color(&packing, 64 + 47), [7, 5, 0, 255]);
        assert_eq!(cell_color(&packing, 112 + 7), [3, 1, 0, 255]);
        assert!(packing.uppers.is_empty());
        assert_eq!(packing.tile_count, 128);
    }

    #[test]
    fn test_empty_image_goes_to_cell_zero() {
        let request = PackRequest::new(Vec::new()).with_empty(PackItem::new(
            id("base:tile/empty"),
            ShapeClass::Single,
            SourceImage::filled(16, 16, [1, 2, 3, 4]),
        ));
        let packing = render(&request, &[], 64);
        assert_eq!(cell_color(&packing, 0), [1, 2, 3, 4]);
        assert_eq!(packing.tile_count, 1);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let grass = PackItem::new(
            id("base:tile/grass"),
            ShapeClass::Single,
            SourceImage::filled(16, 16, [0; 4]),
        );

        let request = PackRequest::new(vec![grass.clone(), grass.clone()]);
        assert_eq!(
            request.validate(),
            Err(ConfigError::DuplicateTile(id("base:tile/grass")))
        );

        let mut wrong = grass.clone();
        wrong.shape = ShapeClass::ShortAutotile;
        assert!(matches!(
            PackRequest::new(vec![wrong]).validate(),
            Err(ConfigError::DimensionMismatch { .. })
        ));

        let tall_empty = PackItem::new(
            id("base:tile/empty"),
            ShapeClass::TallSingle,
            SourceImage::filled(16, 32, [0; 4]),
        );
        assert!(matches!(
            PackRequest::new(vec![grass]).with_empty(tall_empty).validate(),
            Err(ConfigError::EmptyTileShape { .. })
        ));
    }
}
