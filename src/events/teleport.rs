use bevy_ecs::prelude::Entity;
use glam::Vec2;

/// Move `entity` to `to` without travelling.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportEvent {
    pub entity: Entity,
    pub to: Vec2,
    /// Skip any transition effect.
    pub instant: bool,
}

impl TeleportEvent {
    pub fn new(entity: Entity, x: f32, y: f32) -> Self {
        Self {
            entity,
            to: Vec2::new(x, y),
            instant: false,
        }
    }

    pub fn instant(mut self) -> Self {
        self.instant = true;
        self
    }
}
