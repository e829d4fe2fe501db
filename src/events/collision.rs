//! Collision notification.
//!
//! The [`collision_detector`](crate::systems::collision::collision_detector)
//! system sends a [`CollisionEvent`] through the
//! [`EventBus`](crate::resources::eventbus::EventBus) for every pair of
//! entities whose [`BoxCollider`](crate::components::boxcollider::BoxCollider)s
//! overlap and whose layers/masks are compatible. Each pair is reported once
//! per tick.
//!
//! Listeners subscribe with
//! `bus.subscribe(|e: &CollisionEvent| { ... })` and never need to know about
//! the detector.
use bevy_ecs::prelude::Entity;

use crate::components::group::Group;

/// Event fired when two entities with compatible BoxColliders overlap.
///
/// [`CollisionEvent::a`] is always the lower of the two entity ids. The
/// optional group tags are copied from each participant's [`Group`]
/// component, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
    pub group_a: Option<Group>,
    pub group_b: Option<Group>,
}

impl CollisionEvent {
    pub fn new(a: Entity, b: Entity) -> Self {
        Self {
            a,
            b,
            group_a: None,
            group_b: None,
        }
    }

    pub fn with_groups(mut self, group_a: Option<Group>, group_b: Option<Group>) -> Self {
        self.group_a = group_a;
        self.group_b = group_b;
        self
    }

    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }

    /// The other participant, if `entity` is one of the two.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }

    /// The participant tagged with group `name`, and the other one.
    ///
    /// Returns `None` if neither participant is in that group. If both are,
    /// `a` is returned first.
    pub fn split_by_group(&self, name: &str) -> Option<(Entity, Entity)> {
        let is = |g: &Option<Group>| g.as_ref().is_some_and(|g| g.name() == name);
        if is(&self.group_a) {
            Some((self.a, self.b))
        } else if is(&self.group_b) {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}
