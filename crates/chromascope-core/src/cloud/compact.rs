//! CloudCompactor: per-cell extraction of nonzero counters into a packed
//! entry stream.

use rayon::prelude::*;

use super::{
    cell_base_code, cell_coords, code_of_cell_index, CounterBuffer, CELL_CODES, CELL_COUNT,
    COUNT_CLAMP,
};

/// One compacted counter entry.
///
/// `packed` carries the clamped count in its high 23 bits and the in-cell
/// index in its low 9 bits; `base_code` is the owning cell's base color code,
/// carried alongside so the mesh stage can reconstruct the absolute code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudEntry {
    pub packed: u32,
    pub base_code: u32,
}

impl CloudEntry {
    #[inline]
    pub fn count(self) -> u32 {
        self.packed >> 9
    }

    #[inline]
    pub fn cell_index(self) -> u32 {
        self.packed & (CELL_CODES - 1)
    }

    /// Absolute color code of this entry.
    #[inline]
    pub fn code(self) -> u32 {
        code_of_cell_index(self.base_code, self.cell_index())
    }
}

/// Compact a single cell: scan its 512 codes and pack every nonzero count.
///
/// Entries come out in in-cell index order; by construction there can never
/// be more than 512 of them.
pub fn compact_cell(counter: &CounterBuffer, cell: u32) -> Vec<CloudEntry> {
    let (cx, cy, cz) = cell_coords(cell);
    let base_code = cell_base_code(cx, cy, cz);

    let mut entries = Vec::new();
    for index in 0..CELL_CODES {
        let count = counter.count(code_of_cell_index(base_code, index));
        if count > 0 {
            entries.push(CloudEntry {
                packed: (count.min(COUNT_CLAMP) << 9) | index,
                base_code,
            });
        }
    }
    entries
}

/// Compact the whole grid into one entry stream.
///
/// Cells are processed independently and the stream order across cells is
/// unspecified, mirroring the unordered GPU stream (within this reference
/// implementation the concatenation happens to be in cell order).
pub fn compact_grid(counter: &CounterBuffer) -> Vec<CloudEntry> {
    (0..CELL_COUNT)
        .into_par_iter()
        .flat_map_iter(|cell| compact_cell(counter, cell))
        .collect()
}
