use bevy_ecs::prelude::Component;

/// Classification tag for an entity ("player", "enemy", "bullet", ...).
///
/// Carried along with collision notifications so listeners can tell the
/// participants apart without querying the world.
#[derive(Component, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}
