use bevy_ecs::prelude::Entity;

/// Change of movement parameters for `entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementEvent {
    pub entity: Entity,
    pub speed: f32,
    pub acceleration: f32,
    pub velocity: f32,
}

impl MovementEvent {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            speed: 0.0,
            acceleration: 0.0,
            velocity: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }
}
