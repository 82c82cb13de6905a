//! Marching-squares variant selection
//!
//! Neighbor predicates receive an offset `(dx, dy)` from the center cell,
//! with y growing downward (north is `(0, -1)`). Both entry points call the
//! predicate exactly once per examined neighbor and cache nothing.
//!
//! 8-way masks use the blob layout:
//! ```text
//! NW(1)  N(2)  NE(4)
//!  W(8)   *   E(16)
//! SW(32) S(64) SE(128)
//! ```

/// Neighbor direction flags for 8-way masks
pub mod neighbors {
    pub const NW: u8 = 0b0000_0001;
    pub const N: u8 = 0b0000_0010;
    pub const NE: u8 = 0b0000_0100;
    pub const W: u8 = 0b0000_1000;
    pub const E: u8 = 0b0001_0000;
    pub const SW: u8 = 0b0010_0000;
    pub const S: u8 = 0b0100_0000;
    pub const SE: u8 = 0b1000_0000;
}

/// Neighbor direction flags for 4-way masks
pub mod cardinals {
    pub const N: u8 = 0b0001;
    pub const W: u8 = 0b0010;
    pub const E: u8 = 0b0100;
    pub const S: u8 = 0b1000;
}

/// Every 8-way mask reachable after corner elimination, sorted.
/// A mask's position in this table is its variant index.
pub const MARCH8_MASKS: [u8; 47] = [
    0, 2, 8, 10, 11, 16, 18, 22, 24, 26, 27, 30, 31, 64, 66, 72, 74, 75, 80, 82, 86, 88, 90, 91,
    94, 95, 104, 106, 107, 120, 122, 123, 126, 127, 208, 210, 214, 216, 218, 219, 222, 223, 248,
    250, 251, 254, 255,
];

/// 4-way mask -> variant, for a 4x4 sheet laid out as
/// ```text
/// S    ES    EWS    WS
/// NS   NES   NESW   NWS
/// N    NE    NEW    NW
/// E    EW    W      (none)
/// ```
pub const MARCH4_VARIANTS: [u8; 16] = [15, 8, 14, 11, 12, 9, 13, 10, 0, 4, 3, 7, 1, 5, 2, 6];

/// No same-family neighbors
pub const ISOLATED8: u8 = 0;
/// All eight neighbors are the same family
pub const SURROUNDED8: u8 = 46;
/// Center cell absent; the spare 48th cell of the block
pub const NOTHING8: u8 = 47;

pub const ISOLATED4: u8 = 15;
pub const SURROUNDED4: u8 = 6;
pub const NOTHING4: u8 = ISOLATED4;

/// Drop diagonal bits whose two adjacent cardinals are not both set
pub fn optimize_bitmask(bitmask: u8) -> u8 {
    use neighbors::*;

    let mut result = bitmask;

    if (bitmask & (N | W)) != (N | W) {
        result &= !NW;
    }
    if (bitmask & (N | E)) != (N | E) {
        result &= !NE;
    }
    if (bitmask & (S | E)) != (S | E) {
        result &= !SE;
    }
    if (bitmask & (S | W)) != (S | W) {
        result &= !SW;
    }

    result
}

/// Calculate the corner-eliminated 8-way mask
pub fn bitmask8<F>(is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    use neighbors::*;

    let mut bitmask = 0u8;

    if is_same(0, -1) {
        bitmask |= N;
    }
    if is_same(1, -1) {
        bitmask |= NE;
    }
    if is_same(1, 0) {
        bitmask |= E;
    }
    if is_same(1, 1) {
        bitmask |= SE;
    }
    if is_same(0, 1) {
        bitmask |= S;
    }
    if is_same(-1, 1) {
        bitmask |= SW;
    }
    if is_same(-1, 0) {
        bitmask |= W;
    }
    if is_same(-1, -1) {
        bitmask |= NW;
    }

    optimize_bitmask(bitmask)
}

/// Calculate the 4-way mask
pub fn bitmask4<F>(is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    use cardinals::*;

    let mut bitmask = 0u8;

    if is_same(0, -1) {
        bitmask |= N;
    }
    if is_same(-1, 0) {
        bitmask |= W;
    }
    if is_same(1, 0) {
        bitmask |= E;
    }
    if is_same(0, 1) {
        bitmask |= S;
    }

    bitmask
}

/// Look up a raw 8-way mask; `None` if corner elimination could never produce it
pub fn variant8(mask: u8) -> Option<u8> {
    MARCH8_MASKS.binary_search(&mask).ok().map(|i| i as u8)
}

/// Look up a raw 4-way mask; `None` if it uses bits above the low four
pub fn variant4(mask: u8) -> Option<u8> {
    MARCH4_VARIANTS.get(mask as usize).copied()
}

/// Select the variant of a 48-cell block from its eight neighbors
pub fn march8<F>(is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    let mask = bitmask8(is_same);
    let variant = variant8(mask);
    debug_assert!(
        variant.is_some(),
        "corner-eliminated mask {mask:#010b} missing from table"
    );
    variant.unwrap_or_else(|| {
        tracing::error!(mask, "march8 mask outside the variant table, using the empty variant");
        NOTHING8
    })
}

/// Like `march8`, but returns `NOTHING8` without querying when the center is absent
pub fn march8_cell<F>(center: bool, is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    if center {
        march8(is_same)
    } else {
        NOTHING8
    }
}

/// Select the variant of a 16-cell block from its four cardinal neighbors
pub fn march4<F>(is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    MARCH4_VARIANTS[bitmask4(is_same) as usize]
}

pub fn march4_cell<F>(center: bool, is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    if center {
        march4(is_same)
    } else {
        NOTHING4
    }
}
