//! Collision systems.
//!
//! - [`collision_detector`] runs the [`CollisionDetector`] over every entity
//!   with a [`MapPosition`] and a [`BoxCollider`], and reports each overlapping
//!   pair as a [`CollisionEvent`] on the [`EventBus`].
//! - [`apply_collision_config`] pushes [`CollisionConfig`] changes into the
//!   detector.
//!
//! # Ordering
//!
//! `apply_collision_config` → `collision_detector` → `dispatch_events`. With
//! [`DeliveryMode::Queued`] the listeners run in `dispatch_events`; with
//! [`DeliveryMode::Immediate`] they run inside `collision_detector`.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, warn};

use crate::components::boxcollider::BoxCollider;
use crate::components::group::Group;
use crate::components::mapposition::MapPosition;
use crate::events::collision::CollisionEvent;
use crate::resources::collisionconfig::{CollisionConfig, DeliveryMode};
use crate::resources::collisiondetector::CollisionDetector;
use crate::resources::eventbus::EventBus;
use crate::resources::shapesource::ShapeSource;
use crate::resources::spatialgrid::is_valid_cell_size;

/// Entities that can collide: both a position and a collider.
pub type ColliderQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static MapPosition, &'static BoxCollider)>;

/// [`ShapeSource`] view over an ECS query.
pub struct QueryShapes<'q, 'w, 's> {
    query: &'q ColliderQuery<'w, 's>,
}

impl<'q, 'w, 's> QueryShapes<'q, 'w, 's> {
    pub fn new(query: &'q ColliderQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl ShapeSource<Entity> for QueryShapes<'_, '_, '_> {
    fn entities(&self) -> impl Iterator<Item = Entity> {
        self.query.iter().map(|(entity, _, _)| entity)
    }

    fn position(&self, id: Entity) -> Option<Vec2> {
        self.query.get(id).ok().map(|(_, position, _)| position.pos)
    }

    fn shape(&self, id: Entity) -> Option<BoxCollider> {
        self.query.get(id).ok().map(|(_, _, collider)| *collider)
    }
}

/// Detect overlapping colliders and send a [`CollisionEvent`] for each pair.
///
/// Participants' [`Group`] tags, when present, travel with the event. Without
/// a [`CollisionConfig`] resource events are queued.
pub fn collision_detector(
    mut detector: ResMut<CollisionDetector<Entity>>,
    bus: Res<EventBus>,
    config: Option<Res<CollisionConfig>>,
    colliders: ColliderQuery<'_, '_>,
    groups: Query<&Group>,
) {
    let delivery = config.map(|c| c.delivery).unwrap_or_default();
    let source = QueryShapes::new(&colliders);

    detector.detect(&source, |a, b| {
        let event = CollisionEvent::new(a, b)
            .with_groups(groups.get(a).ok().cloned(), groups.get(b).ok().cloned());
        match delivery {
            DeliveryMode::Queued => bus.publish(event),
            DeliveryMode::Immediate => {
                bus.publish_immediate(event);
            }
        }
    });
}

/// Resize the detector's grid when [`CollisionConfig`] is added or modified.
///
/// A cell size that is not finite and positive is refused with a warning.
pub fn apply_collision_config(
    config: Option<Res<CollisionConfig>>,
    mut detector: ResMut<CollisionDetector<Entity>>,
) {
    let Some(config) = config else {
        return;
    };
    if !config.is_changed() || detector.cell_size() == config.cell_size {
        return;
    }
    if !is_valid_cell_size(config.cell_size) {
        warn!(
            "Ignoring invalid cell_size {} (keeping {})",
            config.cell_size,
            detector.cell_size()
        );
        return;
    }
    debug!(
        "Collision grid cell size: {} -> {}",
        detector.cell_size(),
        config.cell_size
    );
    detector.set_cell_size(config.cell_size);
}
