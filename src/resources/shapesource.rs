//! Read-only access to the position and shape data the collision detector
//! consumes.
//!
//! The detector never owns entity data. Each tick it walks a [`ShapeSource`]
//! and reads what it needs. Two implementations ship with the crate:
//!
//! - [`ShapeSnapshot`] – plain map-backed storage, handy for tools and tests
//! - the ECS adapter in [`crate::systems::collision`], which reads
//!   [`MapPosition`](crate::components::mapposition::MapPosition) and
//!   [`BoxCollider`] components straight from a `bevy_ecs` query

use std::hash::Hash;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::boxcollider::BoxCollider;

pub trait ShapeSource<Id> {
    /// Every entity that might take part in collision detection this tick.
    fn entities(&self) -> impl Iterator<Item = Id>;

    /// Entities that are not alive are skipped.
    fn is_alive(&self, _id: Id) -> bool {
        true
    }

    fn position(&self, id: Id) -> Option<Vec2>;

    fn shape(&self, id: Id) -> Option<BoxCollider>;
}

/// Map-backed [`ShapeSource`].
///
/// Entities are reported in the order they were first added.
#[derive(Debug, Clone)]
pub struct ShapeSnapshot<Id> {
    entities: Vec<Id>,
    known: FxHashSet<Id>,
    dead: FxHashSet<Id>,
    positions: FxHashMap<Id, Vec2>,
    shapes: FxHashMap<Id, BoxCollider>,
}

impl<Id> Default for ShapeSnapshot<Id> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            known: FxHashSet::default(),
            dead: FxHashSet::default(),
            positions: FxHashMap::default(),
            shapes: FxHashMap::default(),
        }
    }
}

impl<Id: Copy + Eq + Hash> ShapeSnapshot<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity without any data yet.
    pub fn add_entity(&mut self, id: Id) {
        if self.known.insert(id) {
            self.entities.push(id);
        }
    }

    /// Register an entity with both a position and a shape.
    pub fn insert(&mut self, id: Id, position: Vec2, shape: BoxCollider) {
        self.set_position(id, position);
        self.set_shape(id, shape);
    }

    pub fn set_position(&mut self, id: Id, position: Vec2) {
        self.add_entity(id);
        self.positions.insert(id, position);
    }

    pub fn set_shape(&mut self, id: Id, shape: BoxCollider) {
        self.add_entity(id);
        self.shapes.insert(id, shape);
    }

    pub fn remove_shape(&mut self, id: Id) -> Option<BoxCollider> {
        self.shapes.remove(&id)
    }

    /// Mark an entity as no longer alive. Its data is kept but ignored.
    pub fn kill(&mut self, id: Id) {
        self.dead.insert(id);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<Id: Copy + Eq + Hash> ShapeSource<Id> for ShapeSnapshot<Id> {
    fn entities(&self) -> impl Iterator<Item = Id> {
        self.entities.iter().copied()
    }

    fn is_alive(&self, id: Id) -> bool {
        !self.dead.contains(&id)
    }

    fn position(&self, id: Id) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    fn shape(&self, id: Id) -> Option<BoxCollider> {
        self.shapes.get(&id).copied()
    }
}
