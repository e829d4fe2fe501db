//! JSON scene description.
//!
//! A scene is a flat list of collidable entities. Layers and masks are given
//! by name (see [`CollisionLayer::from_name`]); when omitted they default to
//! `All`.
//!
//! ```json
//! {
//!   "entities": [
//!     { "x": 0, "y": 0, "width": 10, "height": 10,
//!       "layer": ["Player"], "mask": ["Enemy", "Wall"], "group": "player" },
//!     { "x": 5, "y": 5, "width": 10, "height": 10,
//!       "layer": ["Enemy"], "group": "enemy" }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::boxcollider::BoxCollider;
use crate::components::collisionlayer::CollisionLayer;
use crate::components::group::Group;
use crate::components::mapposition::MapPosition;

fn all_layers() -> Vec<String> {
    vec!["All".to_string()]
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default = "all_layers")]
    pub layer: Vec<String>,
    #[serde(default = "all_layers")]
    pub mask: Vec<String>,
    #[serde(default)]
    pub group: Option<String>,
}

impl SceneEntity {
    pub fn collider(&self) -> BoxCollider {
        BoxCollider::new(self.width, self.height)
            .with_offset(Vec2::new(self.offset_x, self.offset_y))
            .with_layers(
                CollisionLayer::from_names(&self.layer),
                CollisionLayer::from_names(&self.mask),
            )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SceneFile {
    pub entities: Vec<SceneEntity>,
}

impl SceneFile {
    /// Loads a scene from a JSON file at the specified path.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&file_content)?;
        info!("Loaded scene {} with {} entities", path, scene.entities.len());
        Ok(scene)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// `count` square boxes scattered over `area`, on the Player/Enemy/Wall
    /// layers, each willing to collide with everything.
    pub fn random(count: usize, area: Vec2, rng: &mut Rng) -> Self {
        const KINDS: [(&str, &str); 3] = [("Player", "player"), ("Enemy", "enemy"), ("Wall", "wall")];
        let entities = (0..count)
            .map(|_| {
                let (layer, group) = KINDS[rng.usize(..KINDS.len())];
                let size = 4.0 + rng.f32() * 28.0;
                SceneEntity {
                    x: rng.f32() * area.x,
                    y: rng.f32() * area.y,
                    width: size,
                    height: size,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    layer: vec![layer.to_string()],
                    mask: all_layers(),
                    group: Some(group.to_string()),
                }
            })
            .collect();
        Self { entities }
    }

    /// Spawn every entity into `world`, returning their ids in file order.
    pub fn spawn(&self, world: &mut World) -> Vec<Entity> {
        self.entities
            .iter()
            .map(|e| {
                let mut entity = world.spawn((MapPosition::new(e.x, e.y), e.collider()));
                if let Some(group) = &e.group {
                    entity.insert(Group::new(group.clone()));
                }
                entity.id()
            })
            .collect()
    }
}
