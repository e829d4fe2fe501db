//! Uniform spatial grid.
//!
//! The [`SpatialGrid`] buckets identifiers by the fixed-size square cell they
//! occupy. It is the broad-phase store of the
//! [`CollisionDetector`](crate::resources::collisiondetector::CollisionDetector),
//! which clears and repopulates it every tick.
//!
//! # Cell keys
//!
//! A world coordinate maps to a [`CellKey`] by floor-dividing each axis by the
//! cell size, so negative coordinates land in negative cells:
//!
//! ```text
//! cell_size = 64
//! (  10.0,  10.0) -> ( 0,  0)
//! (  64.0,   0.0) -> ( 1,  0)
//! (  -0.5, -64.0) -> (-1, -1)
//! ```
//!
//! No deduplication happens here. An id inserted twice in the same cell is
//! returned twice; an id spanning a cell boundary is expected to be inserted
//! into every cell it covers.
//!
//! The cell size must be finite and positive. Anything else is refused with a
//! warning: [`SpatialGrid::new`] falls back to [`DEFAULT_CELL_SIZE`] and
//! [`SpatialGrid::set_cell_size`] keeps the current size.

use arrayvec::ArrayVec;
use glam::Vec2;
use log::warn;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Default cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// Whether `size` can be used as a cell edge length.
pub fn is_valid_cell_size(size: f32) -> bool {
    size.is_finite() && size > 0.0
}

/// Offsets of the 8 cells surrounding a cell, row by row.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Keys of the 8 adjacent cells, not including `self`.
    pub fn neighbors(self) -> ArrayVec<CellKey, 8> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|(dx, dy)| CellKey::new(self.x.wrapping_add(*dx), self.y.wrapping_add(*dy)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    cell_size: f32,
    cells: FxHashMap<CellKey, Vec<T>>,
}

impl<T> Default for SpatialGrid<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl<T> SpatialGrid<T> {
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if is_valid_cell_size(cell_size) {
            cell_size
        } else {
            warn!(
                "Invalid grid cell size {} (using {})",
                cell_size, DEFAULT_CELL_SIZE
            );
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change the cell size. Existing buckets were keyed with the old size, so
    /// the grid is emptied and must be repopulated.
    ///
    /// An invalid size is ignored and `false` is returned; the grid is left untouched.
    pub fn set_cell_size(&mut self, cell_size: f32) -> bool {
        if !is_valid_cell_size(cell_size) {
            warn!(
                "Ignoring invalid grid cell size {} (keeping {})",
                cell_size, self.cell_size
            );
            return false;
        }
        self.cell_size = cell_size;
        self.cells.clear();
        true
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Append `item` to the bucket of `cell`, creating it if absent.
    pub fn insert(&mut self, cell: CellKey, item: T) {
        self.cells.entry(cell).or_default().push(item);
    }

    /// Occupants of exactly `cell`.
    pub fn query(&self, cell: CellKey) -> &[T] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over every non-empty cell and its occupants.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &[T])> {
        self.cells.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Cell containing a world-space point.
    pub fn cell_of(&self, point: Vec2) -> CellKey {
        CellKey::new(
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Every cell in the inclusive range covered by the box `min..max`.
    pub fn cells_overlapping(&self, min: Vec2, max: Vec2) -> SmallVec<[CellKey; 4]> {
        let lo = self.cell_of(min);
        let hi = self.cell_of(max);
        let mut keys = SmallVec::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                keys.push(CellKey::new(x, y));
            }
        }
        keys
    }
}

impl<T: Clone> SpatialGrid<T> {
    /// Occupants of the 8 cells around `cell`, concatenated. `cell` itself is not included.
    pub fn query_neighbors(&self, cell: CellKey) -> Vec<T> {
        let mut result = Vec::new();
        self.query_neighbors_into(cell, &mut result);
        result
    }

    /// Same as [`query_neighbors`](Self::query_neighbors) but writes into `buf`
    /// (cleared first) so callers can reuse the allocation.
    pub fn query_neighbors_into(&self, cell: CellKey, buf: &mut Vec<T>) {
        buf.clear();
        for neighbor in cell.neighbors() {
            if let Some(items) = self.cells.get(&neighbor) {
                buf.extend_from_slice(items);
            }
        }
    }
}
