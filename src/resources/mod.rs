//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `collisionconfig` – cell size and delivery mode, loaded from INI
//! - `collisiondetector` – per-tick broad/narrow phase and its statistics
//! - `eventbus` – type-indexed publish/subscribe bus shared by all systems
//! - `shapesource` – read-only position/shape access consumed by the detector
//! - `spatialgrid` – uniform bucket grid used by the broad phase
pub mod collisionconfig;
pub mod collisiondetector;
pub mod eventbus;
pub mod shapesource;
pub mod spatialgrid;
