//! Event payloads exchanged through the
//! [`EventBus`](crate::resources::eventbus::EventBus).
//!
//! Events give systems a decoupled way to communicate: the producer publishes
//! a value and never learns who, if anyone, reacts to it. The bus accepts any
//! `'static + Send` type; the ones here are the stock payloads.
//!
//! Submodules:
//! - [`collision`] – overlap notifications emitted by the collision detector
//! - [`damage`] / [`heal`] – health changes requested by combat or scripting
//! - [`movement`] / [`physics`] / [`teleport`] – requests for the movement layer
//! - [`surface`] – contact with a ground surface (ice, sand, ...)
pub mod collision;
pub mod damage;
pub mod heal;
pub mod movement;
pub mod physics;
pub mod surface;
pub mod teleport;
