//! Slab packer with slot reuse
//!
//! The atlas is treated as a sequence of 64-cell slabs. Slab 0 is reserved
//! for the empty tile and single cells; every other slab holds one combo,
//! one 48-cell block (plus a spare quarter), two 32-cell blocks or four
//! 16-cell blocks. Leftover quarters and halves are refilled before new
//! slabs are opened.

use crate::request::{columns_for_cells, render, PackItem, PackRequest, Packing, SLAB_CELLS};
use crate::PackStrategy;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::Range;
use tilestitch_core::{ConfigError, Identifier, ShapeClass, TileId, EMPTY_ID};

const QUARTER: u32 = 16;
const HALF: u32 = 32;
const WIDE_CELLS: u32 = 48;

/// The default packer
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPacker;

impl GreedyPacker {
    pub fn new() -> Self {
        Self
    }
}

impl PackStrategy for GreedyPacker {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn pack(&self, request: &PackRequest) -> Result<Packing, ConfigError> {
        request.validate()?;
        let combos = resolve_combos(&request.items, &request.combos)?;
        let plan = SlabPlan::build(&request.items, &combos);

        let needed_slabs = plan.tile_count.div_ceil(SLAB_CELLS);
        let slabs = plan.estimated_slabs.max(needed_slabs);
        let columns = columns_for_cells(u64::from(slabs) * u64::from(SLAB_CELLS));

        tracing::info!(
            tiles = request.items.len(),
            combos = combos.len(),
            estimated_slabs = plan.estimated_slabs,
            used_slabs = needed_slabs,
            columns,
            "packing atlas"
        );

        Ok(render(request, &plan.bases, columns))
    }
}

/// Turn combo names into `(wide index, short index)` pairs
fn resolve_combos(
    items: &[PackItem],
    combos: &[(Identifier, Identifier)],
) -> Result<Vec<(usize, usize)>, ConfigError> {
    let index: HashMap<&Identifier, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (&item.name, i))
        .collect();

    let lookup = |name: &Identifier, expected: ShapeClass| -> Result<usize, ConfigError> {
        let &i = index.get(name).ok_or_else(|| ConfigError::UnknownTile {
            tile: name.clone(),
            referenced_by: "combos".to_string(),
        })?;
        if items[i].shape != expected {
            return Err(ConfigError::ComboShape {
                tile: name.clone(),
                expected,
                actual: items[i].shape,
            });
        }
        Ok(i)
    };

    let mut paired = HashSet::new();
    let mut resolved = Vec::with_capacity(combos.len());
    for (wide, short) in combos {
        let w = lookup(wide, ShapeClass::WideAutotile48)?;
        let s = lookup(short, ShapeClass::ShortAutotile)?;
        if !paired.insert(w) {
            return Err(ConfigError::ComboConflict(wide.clone()));
        }
        if !paired.insert(s) {
            return Err(ConfigError::ComboConflict(short.clone()));
        }
        resolved.push((w, s));
    }
    Ok(resolved)
}

/// Base ID for every item plus the sizing inputs
struct SlabPlan {
    bases: Vec<TileId>,
    estimated_slabs: u32,
    tile_count: u32,
}

impl SlabPlan {
    fn build(items: &[PackItem], combos: &[(usize, usize)]) -> Self {
        let mut paired = vec![false; items.len()];
        for &(w, s) in combos {
            paired[w] = true;
            paired[s] = true;
        }

        let unpaired = |shape: ShapeClass| -> Vec<usize> {
            (0..items.len())
                .filter(|&i| items[i].shape == shape && !paired[i])
                .collect()
        };
        let wides = unpaired(ShapeClass::WideAutotile48);
        let talls = unpaired(ShapeClass::TallAutotile);
        let shorts = unpaired(ShapeClass::ShortAutotile);
        let tall_singles = unpaired(ShapeClass::TallSingle);
        let singles = unpaired(ShapeClass::Single);

        let single_cells = (tall_singles.len() * 2 + singles.len()) as u32;
        let estimated_slabs = 1
            + combos.len() as u32
            + wides.len() as u32
            + (talls.len() as u32).div_ceil(2)
            + (shorts.len() as u32).div_ceil(4)
            + single_cells.div_ceil(SLAB_CELLS - 1);

        let mut bases = vec![EMPTY_ID; items.len()];
        let mut next_slab = 1;
        let mut open_slab = || {
            let base = next_slab * SLAB_CELLS;
            next_slab += 1;
            base
        };

        for &(w, s) in combos {
            let base = open_slab();
            bases[w] = base;
            bases[s] = base + WIDE_CELLS;
        }

        // 16-cell gaps left behind, lowest first
        let mut quarters = VecDeque::new();
        for &i in &wides {
            let base = open_slab();
            bases[i] = base;
            quarters.push_back(base + WIDE_CELLS);
        }

        let mut half = None;
        for pair in talls.chunks(2) {
            let base = open_slab();
            bases[pair[0]] = base;
            match pair.get(1) {
                Some(&second) => bases[second] = base + HALF,
                None => half = Some(base + HALF),
            }
        }

        for &i in &shorts {
            bases[i] = if let Some(quarter) = quarters.pop_front() {
                quarter
            } else if let Some(start) = half.take() {
                quarters.push_back(start + QUARTER);
                start
            } else {
                let base = open_slab();
                quarters.extend([base + QUARTER, base + 2 * QUARTER, base + 3 * QUARTER]);
                base
            };
        }

        let mut free: Vec<Range<TileId>> = vec![EMPTY_ID + 1..SLAB_CELLS];
        free.extend(quarters.into_iter().map(|q| q..q + QUARTER));
        free.extend(half.map(|h| h..h + HALF));
        free.sort_by_key(|range| range.start);
        let mut tail = next_slab * SLAB_CELLS;

        for &i in tall_singles.iter().chain(&singles) {
            bases[i] = first_fit(&mut free, &mut tail, items[i].shape.cell_count());
        }

        let tile_count = items
            .iter()
            .zip(&bases)
            .map(|(item, &base)| base + item.shape.cell_count())
            .max()
            .unwrap_or(EMPTY_ID + 1);

        Self {
            bases,
            estimated_slabs,
            tile_count,
        }
    }
}

/// Take `cells` from the lowest free range that fits, else append at `tail`
fn first_fit(free: &mut [Range<TileId>], tail: &mut TileId, cells: u32) -> TileId {
    if let Some(range) = free.iter_mut().find(|r| r.len() as u32 >= cells) {
        let start = range.start;
        range.start += cells;
        return start;
    }
    let start = *tail;
    *tail += cells;
    start
}
