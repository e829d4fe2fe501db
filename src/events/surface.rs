use std::fmt;

use bevy_ecs::prelude::Entity;
use glam::Vec2;
use log::warn;

/// Ground material an entity can stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Ice,
    Sand,
    Grass,
    Liquid,
    /// Behavior given by [`SurfaceBehaviorEvent::custom_velocity`].
    Custom,
}

impl SurfaceKind {
    /// Case-insensitive parse. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ice" => Some(Self::Ice),
            "sand" => Some(Self::Sand),
            "grass" => Some(Self::Grass),
            "liquid" => Some(Self::Liquid),
            "custom" => Some(Self::Custom),
            _ => {
                warn!("Unknown surface kind: {}", name);
                None
            }
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ice => "ICE",
            Self::Sand => "SAND",
            Self::Grass => "GRASS",
            Self::Liquid => "LIQUID",
            Self::Custom => "CUSTOM",
        };
        f.write_str(name)
    }
}

/// `entity` is in contact with the `surface` entity and should pick up its behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBehaviorEvent {
    pub entity: Entity,
    pub surface: Entity,
    pub kind: SurfaceKind,
    pub custom_velocity: Option<Vec2>,
}

impl SurfaceBehaviorEvent {
    pub fn new(entity: Entity, surface: Entity, kind: SurfaceKind) -> Self {
        Self {
            entity,
            surface,
            kind,
            custom_velocity: None,
        }
    }

    pub fn with_custom_velocity(mut self, velocity: Vec2) -> Self {
        self.custom_velocity = Some(velocity);
        self
    }
}
