//! Collision and event systems.
//!
//! Submodules overview
//! - [`collision`] – grid broad phase, narrow phase and event emission
//! - [`events`] – per-tick dispatch of queued bus events
//!
//! [`setup_collision`] inserts the resources these systems need and
//! [`collision_schedule`] orders them for one tick.

pub mod collision;
pub mod events;

use bevy_ecs::prelude::*;

use crate::resources::collisionconfig::CollisionConfig;
use crate::resources::collisiondetector::CollisionDetector;
use crate::resources::eventbus::EventBus;
use crate::systems::collision::{apply_collision_config, collision_detector};
use crate::systems::events::dispatch_events;

/// Insert [`CollisionConfig`], a matching [`CollisionDetector`] and, unless
/// one is already present, an [`EventBus`].
///
/// Returns a handle to the bus so callers can subscribe right away.
pub fn setup_collision(world: &mut World, config: CollisionConfig) -> EventBus {
    world.insert_resource(CollisionDetector::<Entity>::new(config.cell_size));
    world.insert_resource(config);
    if !world.contains_resource::<EventBus>() {
        world.insert_resource(EventBus::new());
    }
    world.resource::<EventBus>().clone()
}

/// One simulation tick: apply config, detect collisions, dispatch queued events.
pub fn collision_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((apply_collision_config, collision_detector, dispatch_events).chain());
    schedule
}
