//! Broad-phase + narrow-phase collision detection.
//!
//! [`CollisionDetector::detect`] runs once per tick:
//!
//! 1. Every alive entity with both a position and a [`BoxCollider`] is
//!    inserted into every grid cell its AABB covers.
//! 2. For each occupied cell, occupants are paired with each other and with
//!    the occupants of the 8 neighbor cells. Pairs are canonicalized to
//!    `(min, max)` and run through a per-tick "checked" set, so a pair proposed
//!    by several cells is processed once.
//! 3. The layer/mask filter runs before the geometry test.
//! 4. Half-open AABB overlap confirms the collision and the callback fires.
//!
//! Because an entity is inserted into every cell it touches, two overlapping
//! boxes always share at least one cell, whatever their size relative to the
//! cell. The neighbor scan only adds candidates; the cell size does not adapt
//! to object size.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use bevy_ecs::prelude::Resource;
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::boxcollider::{Aabb, BoxCollider};
use crate::resources::shapesource::ShapeSource;
use crate::resources::spatialgrid::{CellKey, DEFAULT_CELL_SIZE, SpatialGrid};

/// Counters from the last [`CollisionDetector::detect`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorStats {
    /// Entities inserted into the grid.
    pub indexed: usize,
    /// Non-empty grid cells.
    pub occupied_cells: usize,
    /// Pair proposals, duplicates included.
    pub candidates: usize,
    /// Distinct pairs that reached the filter.
    pub unique_pairs: usize,
    /// Distinct pairs rejected by the layer/mask filter.
    pub filtered: usize,
    /// Pairs reported as colliding.
    pub collisions: usize,
}

#[derive(Resource, Debug)]
pub struct CollisionDetector<Id: Send + Sync + 'static> {
    grid: SpatialGrid<Id>,
    /// This tick's AABB and collider for every indexed entity.
    bounds: FxHashMap<Id, (Aabb, BoxCollider)>,
    checked: FxHashSet<(Id, Id)>,
    cells: Vec<CellKey>,
    neighbors: Vec<Id>,
    stats: DetectorStats,
}

impl<Id: Send + Sync + 'static> Default for CollisionDetector<Id> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl<Id: Send + Sync + 'static> CollisionDetector<Id> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
            bounds: FxHashMap::default(),
            checked: FxHashSet::default(),
            cells: Vec::new(),
            neighbors: Vec::new(),
            stats: DetectorStats::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    /// Change the grid cell size. Takes effect on the next [`detect`](Self::detect).
    ///
    /// Returns `false`, keeping the current size, when `cell_size` is not
    /// finite and positive.
    pub fn set_cell_size(&mut self, cell_size: f32) -> bool {
        self.grid.set_cell_size(cell_size)
    }

    pub fn stats(&self) -> DetectorStats {
        self.stats
    }
}

impl<Id> CollisionDetector<Id>
where
    Id: Copy + Ord + Hash + Send + Sync + 'static,
{
    /// Run one tick of detection over `source`, calling `on_collision(a, b)`
    /// with `a < b` exactly once for every overlapping, compatible pair.
    ///
    /// Returns the number of collisions reported.
    pub fn detect<S, F>(&mut self, source: &S, mut on_collision: F) -> usize
    where
        S: ShapeSource<Id>,
        F: FnMut(Id, Id),
    {
        self.grid.clear();
        self.bounds.clear();
        self.checked.clear();
        let mut stats = DetectorStats::default();

        for id in source.entities() {
            if !source.is_alive(id) {
                continue;
            }
            // Entities still under construction lack one of the two.
            let (Some(position), Some(shape)) = (source.position(id), source.shape(id)) else {
                continue;
            };
            // A repeated id keeps its first record.
            let Entry::Vacant(slot) = self.bounds.entry(id) else {
                continue;
            };
            let aabb = shape.aabb(position);
            slot.insert((aabb, shape));
            for cell in self.grid.cells_overlapping(aabb.min, aabb.max) {
                self.grid.insert(cell, id);
            }
            stats.indexed += 1;
        }

        let Self {
            grid,
            bounds,
            checked,
            cells,
            neighbors,
            ..
        } = self;

        cells.clear();
        cells.extend(grid.iter().map(|(key, _)| key));
        cells.sort_unstable();
        stats.occupied_cells = cells.len();

        for &cell in cells.iter() {
            let occupants = grid.query(cell);
            grid.query_neighbors_into(cell, neighbors);

            for (i, &a) in occupants.iter().enumerate() {
                for &b in occupants[i + 1..].iter().chain(neighbors.iter()) {
                    stats.candidates += 1;
                    if a == b {
                        continue;
                    }
                    let pair = if a < b { (a, b) } else { (b, a) };
                    if !checked.insert(pair) {
                        continue;
                    }
                    stats.unique_pairs += 1;

                    let (Some((box_a, shape_a)), Some((box_b, shape_b))) =
                        (bounds.get(&pair.0), bounds.get(&pair.1))
                    else {
                        continue;
                    };
                    if !shape_a.can_collide(shape_b) {
                        stats.filtered += 1;
                        continue;
                    }
                    if box_a.overlaps(box_b) {
                        stats.collisions += 1;
                        on_collision(pair.0, pair.1);
                    }
                }
            }
        }

        trace!(
            "collision tick: {} indexed, {} cells, {} candidates, {} unique, {} filtered, {} collisions",
            stats.indexed,
            stats.occupied_cells,
            stats.candidates,
            stats.unique_pairs,
            stats.filtered,
            stats.collisions
        );
        self.stats = stats;
        stats.collisions
    }
}
