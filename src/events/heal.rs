use bevy_ecs::prelude::Entity;

/// Request to restore health on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct HealEvent {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: f32,
    /// Where the healing comes from ("magic", "item", ...).
    pub kind: String,
    pub effect: String,
    /// Allow going above maximum health.
    pub overheal: bool,
}

impl HealEvent {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            source: None,
            amount: 0.0,
            kind: String::new(),
            effect: String::new(),
            overheal: false,
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

    pub fn overheal(mut self) -> Self {
        self.overheal = true;
        self
    }
}
