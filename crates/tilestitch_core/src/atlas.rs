//! The packed RGBA texture atlas

use crate::{TileId, TILE_SIZE};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};

const CHANNELS: usize = 4;

/// A square RGBA8 image whose side is `16 * 2^n` pixels
///
/// Cell `id` has its top-left pixel at
/// `((id % columns) * 16, (id / columns) * 16)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    dimension: u32,
    pixels: Vec<u8>,
}

impl Atlas {
    /// Allocate a fully transparent atlas
    pub fn new(dimension: u32) -> Self {
        debug_assert!(dimension % TILE_SIZE == 0);
        debug_assert!((dimension / TILE_SIZE).is_power_of_two());
        let len = dimension as usize * dimension as usize * CHANNELS;
        Self {
            dimension,
            pixels: vec![0; len],
        }
    }

    /// Side length in pixels
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Side length in cells
    pub fn columns(&self) -> u32 {
        self.dimension / TILE_SIZE
    }

    /// Total number of cells the atlas can hold
    pub fn capacity(&self) -> u32 {
        self.columns() * self.columns()
    }

    /// Raw RGBA pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Top-left pixel coordinate of a cell
    pub fn cell_origin(&self, id: TileId) -> (u32, u32) {
        let columns = self.columns();
        ((id % columns) * TILE_SIZE, (id / columns) * TILE_SIZE)
    }

    /// Copy one 16x16 cell out of an RGBA source image
    ///
    /// `source_width` is the width of `rgba` in pixels; (`cell_x`, `cell_y`) is
    /// the source cell in cell units. Returns `false` and copies nothing when
    /// `id` is outside the atlas or the cell lies outside `rgba`.
    pub fn blit_cell(
        &mut self,
        id: TileId,
        rgba: &[u8],
        source_width: u32,
        cell_x: u32,
        cell_y: u32,
    ) -> bool {
        let tile = TILE_SIZE as usize;
        let right = (cell_x as usize + 1) * tile;
        let bottom = (cell_y as usize + 1) * tile;
        let source_end = ((bottom - 1) * source_width as usize + right) * CHANNELS;
        if id >= self.capacity() || right > source_width as usize || rgba.len() < source_end {
            return false;
        }

        let (dest_x, dest_y) = self.cell_origin(id);
        let row_bytes = TILE_SIZE as usize * CHANNELS;
        for row in 0..TILE_SIZE {
            let src_y = cell_y * TILE_SIZE + row;
            let src_start = (src_y as usize * source_width as usize
                + (cell_x * TILE_SIZE) as usize)
                * CHANNELS;
            let dest_start =
                ((dest_y + row) as usize * self.dimension as usize + dest_x as usize) * CHANNELS;
            self.pixels[dest_start..dest_start + row_bytes]
                .copy_from_slice(&rgba[src_start..src_start + row_bytes]);
        }
        true
    }

    /// Read back one cell as a tightly packed 16x16 RGBA buffer
    pub fn cell_pixels(&self, id: TileId) -> Option<Vec<u8>> {
        if id >= self.capacity() {
            return None;
        }
        let (x, y) = self.cell_origin(id);
        let row_bytes = TILE_SIZE as usize * CHANNELS;
        let mut out = Vec::with_capacity(row_bytes * TILE_SIZE as usize);
        for row in 0..TILE_SIZE {
            let start = ((y + row) as usize * self.dimension as usize + x as usize) * CHANNELS;
            out.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        Some(out)
    }

    /// Encode the whole atlas as a PNG byte blob
    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            &self.pixels,
            self.dimension,
            self.dimension,
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }
}
