//! Collision layer bit flags.
//!
//! A [`CollisionLayer`] is an 8-bit set of named layers. Every
//! [`BoxCollider`](crate::components::boxcollider::BoxCollider) carries two of
//! them: the `layer` it belongs to and the `mask` of layers it is willing to
//! collide with.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use log::warn;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CollisionLayer(pub u8);

impl CollisionLayer {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1);
    pub const ENEMY: Self = Self(1 << 1);
    pub const PROJECTILE: Self = Self(1 << 2);
    /// Walls and other static obstacles.
    pub const WALL: Self = Self(1 << 3);
    pub const PICKUP: Self = Self(1 << 4);
    pub const TRIGGER: Self = Self(1 << 5);
    /// Invisible sensors.
    pub const SENSOR: Self = Self(1 << 6);
    /// Water, lava, traps.
    pub const ENVIRONMENT: Self = Self(1 << 7);
    pub const ALL: Self = Self(0xFF);

    const NAMED: [(&'static str, Self); 10] = [
        ("None", Self::NONE),
        ("Player", Self::PLAYER),
        ("Enemy", Self::ENEMY),
        ("Projectile", Self::PROJECTILE),
        ("Wall", Self::WALL),
        ("Pickup", Self::PICKUP),
        ("Trigger", Self::TRIGGER),
        ("Sensor", Self::SENSOR),
        ("Environment", Self::ENVIRONMENT),
        ("All", Self::ALL),
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if at least one bit is shared.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Look up a single layer by name (case-insensitive).
    ///
    /// Unknown names resolve to [`CollisionLayer::NONE`] and log a warning,
    /// so a typo in a scene file disables collisions instead of failing the load.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, layer)| *layer)
            .unwrap_or_else(|| {
                warn!("Unknown CollisionLayer: {} (defaulting to None)", name);
                Self::NONE
            })
    }

    /// Union of every named layer in `names`.
    pub fn from_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        names
            .into_iter()
            .fold(Self::NONE, |acc, n| acc | Self::from_name(n.as_ref()))
    }
}

impl BitOr for CollisionLayer {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionLayer {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CollisionLayer {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for CollisionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return write!(f, "CollisionLayer(All)");
        }
        if self.is_empty() {
            return write!(f, "CollisionLayer(None)");
        }
        let names: Vec<&str> = Self::NAMED[1..9]
            .iter()
            .filter(|(_, layer)| self.contains(*layer))
            .map(|(n, _)| *n)
            .collect();
        write!(f, "CollisionLayer({})", names.join("|"))
    }
}
