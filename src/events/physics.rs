use bevy_ecs::prelude::Entity;

/// Adjustment of physical parameters, for one entity or for the whole world.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicsEvent {
    /// `None` together with `global` means every body.
    pub entity: Option<Entity>,
    pub velocity: f32,
    pub friction: f32,
    pub gravity: f32,
    pub global: bool,
}

impl PhysicsEvent {
    pub fn for_entity(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
            ..Self::default()
        }
    }

    pub fn global() -> Self {
        Self {
            global: true,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }
}
