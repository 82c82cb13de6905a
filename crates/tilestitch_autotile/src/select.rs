//! Picking a concrete atlas cell for a placed autotile

use crate::march::{march4, march8};
use tilestitch_core::{TileId, Tileset, EMPTY_ID};

/// Marching over a built `Tileset`
pub trait MarchTileset {
    /// Resolve the cell to draw for `center` given its surroundings
    ///
    /// `neighbor_at(dx, dy)` returns the tile ID placed at that offset (y
    /// grows downward). Tiles without marching data are returned unchanged.
    fn march_tile<F>(&self, center: TileId, neighbor_at: F) -> TileId
    where
        F: Fn(i32, i32) -> TileId;

    /// Whether `neighbor` blends with the family of `center`
    fn same_family(&self, center: TileId, neighbor: TileId) -> bool;
}

impl MarchTileset for Tileset {
    fn march_tile<F>(&self, center: TileId, neighbor_at: F) -> TileId
    where
        F: Fn(i32, i32) -> TileId,
    {
        let Some(info) = self.marchable_info_for_id(center) else {
            return center;
        };

        let is_same = |dx, dy| self.same_family(center, neighbor_at(dx, dy));
        let variant = if info.eight_way {
            march8(is_same)
        } else {
            march4(is_same)
        };

        info.corner + TileId::from(variant)
    }

    fn same_family(&self, center: TileId, neighbor: TileId) -> bool {
        if neighbor == EMPTY_ID {
            return false;
        }
        let Some(set) = self.autotile_set_of(center) else {
            return false;
        };
        let Some(name) = self.name_of(neighbor) else {
            return false;
        };
        set.contains(name) || (set.omni && self.is_solid(name))
    }
}
