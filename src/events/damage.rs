use bevy_ecs::prelude::Entity;

/// Request to damage `target`.
///
/// Combat code usually sends this with
/// [`EventBus::publish_immediate`](crate::resources::eventbus::EventBus::publish_immediate)
/// so health is resolved before the attacker's own state moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: f32,
    /// Free-form damage type ("fire", "melee", ...).
    pub kind: String,
    pub effect: String,
    pub critical: bool,
}

impl DamageEvent {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            source: None,
            amount: 0.0,
            kind: String::new(),
            effect: String::new(),
            critical: false,
        }
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = effect.into();
        self
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }
}
