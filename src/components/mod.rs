//! ECS components for entities.
//!
//! Components read by the collision detector. They are owned by the world;
//! the detector only reads them.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned rectangular collider with layer and mask
//! - [`collisionlayer`] – named layer bit flags used for filtering
//! - [`group`] – tag component for grouping entities by name
//! - [`mapposition`] – world-space position (top-left) for an entity

pub mod boxcollider;
pub mod collisionlayer;
pub mod group;
pub mod mapposition;
