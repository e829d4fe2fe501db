//! gridcollide library.
//!
//! Grid-based collision detection and a type-indexed event bus for 2D
//! simulations built on `bevy_ecs`. Exposes the components, resources, systems
//! and events for use in integration tests and as a reusable library.

pub mod components;
pub mod events;
pub mod resources;
pub mod scene;
pub mod systems;
