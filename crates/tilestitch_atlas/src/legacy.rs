//! Append-only packer
//!
//! Autotile blocks go first in request order, each aligned to a 16-cell
//! boundary, followed by singles. Nothing is backfilled.

use crate::request::{columns_for_cells, render, PackRequest, Packing};
use crate::PackStrategy;
use tilestitch_core::{ConfigError, ShapeClass, TileId, EMPTY_ID};

const BLOCK_ALIGN: u32 = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPacker;

impl LegacyPacker {
    pub fn new() -> Self {
        Self
    }
}

impl PackStrategy for LegacyPacker {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn pack(&self, request: &PackRequest) -> Result<Packing, ConfigError> {
        if !request.combos.is_empty() {
            return Err(ConfigError::CombosUnsupported {
                strategy: self.name(),
            });
        }
        if let Some(item) = request
            .items
            .iter()
            .find(|item| item.shape == ShapeClass::WideAutotile48)
        {
            return Err(ConfigError::UnsupportedShape {
                strategy: self.name(),
                tile: item.name.clone(),
                shape: item.shape,
            });
        }
        request.validate()?;

        let mut bases = vec![EMPTY_ID; request.items.len()];
        let mut cursor: TileId = EMPTY_ID + 1;

        for (i, item) in request.items.iter().enumerate() {
            if item.shape.is_autotile() {
                cursor = cursor.next_multiple_of(BLOCK_ALIGN);
                bases[i] = cursor;
                cursor += item.shape.cell_count();
            }
        }
        for (i, item) in request.items.iter().enumerate() {
            if !item.shape.is_autotile() {
                bases[i] = cursor;
                cursor += item.shape.cell_count();
            }
        }

        let columns = columns_for_cells(u64::from(cursor));
        tracing::info!(
            tiles = request.items.len(),
            cells = cursor,
            columns,
            "packing atlas (legacy)"
        );

        Ok(render(request, &bases, columns))
    }
}
