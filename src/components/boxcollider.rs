use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::collisionlayer::CollisionLayer;

/// World-space axis-aligned box, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a top-left corner and a size.
    pub fn from_rect(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Half-open overlap test: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y)
    }
}

/// Collision shape of an entity: a box relative to its [`MapPosition`] plus
/// the layer/mask pair used for filtering.
///
/// [`MapPosition`]: crate::components::mapposition::MapPosition
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
    /// What this collider is.
    pub layer: CollisionLayer,
    /// What this collider may collide with.
    pub mask: CollisionLayer,
}

impl BoxCollider {
    /// Create a BoxCollider with given size, on every layer and colliding with everything.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            layer: CollisionLayer::ALL,
            mask: CollisionLayer::ALL,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Modify BoxCollider with given layer and mask
    pub fn with_layers(mut self, layer: CollisionLayer, mask: CollisionLayer) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Returns the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2) -> Aabb {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        Aabb {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    /// Layer/mask filter. Either side declaring interest in the other is enough.
    pub fn can_collide(&self, other: &Self) -> bool {
        self.mask.intersects(other.layer) || other.mask.intersects(self.layer)
    }

    /// Filter and AABB test against another BoxCollider at a different entity position.
    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        self.can_collide(other) && self.aabb(position).overlaps(&other.aabb(other_position))
    }
}
